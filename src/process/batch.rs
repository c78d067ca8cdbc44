//! This module turns a directory of images into an ordered list of public links.
//!
//! Files are listed in byte-wise filename order and uploaded one at a time.
//! That order decides the numbering of the rendered note, so it must never
//! depend on how the filesystem happens to list the directory.

use crate::api_client::{
    ApiError, ApiResult, ContainerId, Credential, ImageHost, LocalFile, UploadResult,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the regular files directly inside `dir`, sorted by filename.
///
/// Sorting is byte-wise on the file name (`10.png` comes before `9.png`),
/// so the result does not depend on the order the filesystem returns.
/// Sub-directories and other non-file entries are skipped with a warning.
///
/// # Arguments
///
/// * `dir` - The folder holding the images. A missing path, a path that is
///   not a directory, or an unreadable directory is an [`ApiError::LocalIo`].
///
/// # Example
///
/// ```no_run
/// use ffpics::process::collect_files;
/// use std::path::Path;
///
/// for path in collect_files(Path::new("/league/week1")).expect("Unreadable folder") {
///     println!("{}", path.display());
/// }
/// ```
pub fn collect_files(dir: &Path) -> ApiResult<Vec<PathBuf>> {
    let metadata = fs::metadata(dir).map_err(|e| ApiError::local_io(dir, e))?;
    if !metadata.is_dir() {
        return Err(ApiError::local_io(
            dir,
            io::Error::new(io::ErrorKind::Other, "not a directory"),
        ));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ApiError::local_io(dir, io::Error::from(e)))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path.to_path_buf());
        } else {
            warn!("Skipping {}: not a regular file", path.display());
        }
    }

    Ok(files)
}

/// Uploads every file of `dir` into `container`, strictly one after another.
///
/// Each file is read fully into memory and handed to `host`. The returned
/// links are in the same order as [`collect_files`]. Stops at the first
/// failure. Files uploaded before it stay on the remote side; nothing is
/// rolled back.
///
/// # Arguments
///
/// * `host` - The hosting service receiving the files.
/// * `credential` - Bearer token obtained for this run.
/// * `container` - Album or folder the files are grouped under.
/// * `dir` - The folder holding the images.
///
/// # Example
///
/// ```no_run
/// use ffpics::api_client::{ContainerId, Credential, ImgurClient};
/// use ffpics::upload_all;
/// use std::path::Path;
///
/// async fn example() {
///     let imgur = ImgurClient::new(reqwest::Client::new(), "https://api.imgur.com");
///     let credential = Credential::new("access-token");
///     let album = ContainerId::new("Xy9Qz");
///
///     match upload_all(&imgur, &credential, &album, Path::new("/league/week1")).await {
///         Ok(results) => println!("Uploaded {} files", results.len()),
///         Err(e) => eprintln!("Error: {}", e),
///     }
/// }
/// ```
pub async fn upload_all(
    host: &dyn ImageHost,
    credential: &Credential,
    container: &ContainerId,
    dir: &Path,
) -> ApiResult<Vec<UploadResult>> {
    info!("Uploading files in {} using [container={}]", dir.display(), container);

    let files = collect_files(dir)?;
    let progress = create_progress_bar(files.len() as u64);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file = read_local_file(&path)?;
        progress.set_message(file.name.clone());

        let link = match host.upload_file(credential, container, &file).await {
            Ok(link) => link,
            Err(e) => {
                progress.abandon_with_message(format!("Failed: {}", file.name));
                return Err(e);
            }
        };

        info!("Successfully uploaded {} to {}", path.display(), link);
        results.push(UploadResult { path, link });
        progress.inc(1);
    }

    progress.finish_with_message("All uploads completed");
    info!(
        "Successfully uploaded {} files: {:?}",
        results.len(),
        results.iter().map(|r| r.link.as_str()).collect::<Vec<_>>()
    );
    Ok(results)
}

fn read_local_file(path: &Path) -> ApiResult<LocalFile> {
    let bytes = fs::read(path).map_err(|e| ApiError::local_io(path, e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(LocalFile {
        path: path.to_path_buf(),
        name,
        bytes,
    })
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let progress = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{elapsed_precise} [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
    {
        progress.set_style(style.progress_chars("##-"));
    }
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::MockImageHost;
    use mockall::Sequence;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn create_test_directory(files: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for name in files {
            fs::write(temp_dir.path().join(name), name.as_bytes()).unwrap();
        }
        temp_dir
    }

    fn link_for(file: &LocalFile) -> String {
        format!("https://i.imgur.com/{}", file.name)
    }

    #[test]
    fn test_collect_files_sorted_bytewise() {
        let temp_dir =
            create_test_directory(&["b.png", "a.png", "c.png", "10.png", "9.png", "Z.png"]);

        let names: Vec<String> = collect_files(temp_dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["10.png", "9.png", "Z.png", "a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_collect_files_skips_directories() {
        let temp_dir = create_test_directory(&["a.png"]);
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        File::create(temp_dir.path().join("nested").join("z.png")).unwrap();

        let files = collect_files(temp_dir.path()).unwrap();

        assert_eq!(files, vec![temp_dir.path().join("a.png")]);
    }

    #[test]
    fn test_collect_files_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        assert!(matches!(
            collect_files(&missing),
            Err(ApiError::LocalIo { .. })
        ));
    }

    #[test]
    fn test_collect_files_rejects_regular_file() {
        let temp_dir = create_test_directory(&["not_a_dir.png"]);
        let file = temp_dir.path().join("not_a_dir.png");

        match collect_files(&file) {
            Err(ApiError::LocalIo { path, source }) => {
                assert!(path.ends_with("not_a_dir.png"));
                assert_eq!(source.to_string(), "not a directory");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_all_rejects_regular_file_without_uploading() {
        let temp_dir = create_test_directory(&["not_a_dir.png"]);
        let mut host = MockImageHost::new();
        host.expect_upload_file().never();

        let result = upload_all(
            &host,
            &Credential::new("token"),
            &ContainerId::new("album1"),
            &temp_dir.path().join("not_a_dir.png"),
        )
        .await;

        assert!(matches!(result, Err(ApiError::LocalIo { .. })));
    }

    #[tokio::test]
    async fn test_upload_all_in_sorted_order() {
        let temp_dir = create_test_directory(&["b.png", "a.png", "c.png"]);
        let mut host = MockImageHost::new();
        let mut seq = Sequence::new();

        for expected in ["a.png", "b.png", "c.png"] {
            host.expect_upload_file()
                .withf(move |_, container, file| {
                    container.as_str() == "album1" && file.name == expected
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _, file| Ok(link_for(file)));
        }

        let results = upload_all(
            &host,
            &Credential::new("token"),
            &ContainerId::new("album1"),
            temp_dir.path(),
        )
        .await
        .unwrap();

        let links: Vec<&str> = results.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://i.imgur.com/a.png",
                "https://i.imgur.com/b.png",
                "https://i.imgur.com/c.png"
            ]
        );
        assert_eq!(results[0].path, temp_dir.path().join("a.png"));
    }

    #[tokio::test]
    async fn test_upload_all_sends_file_contents() {
        let temp_dir = create_test_directory(&["pic.jpg"]);
        let mut host = MockImageHost::new();
        host.expect_upload_file()
            .withf(|_, _, file| file.bytes == b"pic.jpg".to_vec())
            .times(1)
            .returning(|_, _, file| Ok(link_for(file)));

        let results = upload_all(
            &host,
            &Credential::new("token"),
            &ContainerId::new("album1"),
            temp_dir.path(),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_all_stops_at_first_failure() {
        let temp_dir = create_test_directory(&["1.png", "2.png", "3.png", "4.png", "5.png"]);
        let mut host = MockImageHost::new();
        let mut seq = Sequence::new();

        for name in ["1.png", "2.png"] {
            host.expect_upload_file()
                .withf(move |_, _, file| file.name == name)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _, file| Ok(link_for(file)));
        }
        host.expect_upload_file()
            .withf(|_, _, file| file.name == "3.png")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, file| {
                Err(ApiError::upload(
                    &file.path,
                    "https://api.imgur.com/3/image",
                    "status 500 Internal Server Error: oops",
                ))
            });

        let err = upload_all(
            &host,
            &Credential::new("token"),
            &ContainerId::new("album1"),
            temp_dir.path(),
        )
        .await
        .unwrap_err();

        match err {
            ApiError::Upload { path, .. } => assert!(path.ends_with("3.png")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_all_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let host = MockImageHost::new();

        let results = upload_all(
            &host,
            &Credential::new("token"),
            &ContainerId::new("album1"),
            temp_dir.path(),
        )
        .await
        .unwrap();

        assert!(results.is_empty());
    }
}
