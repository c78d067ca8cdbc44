mod batch;

pub use batch::{collect_files, upload_all};
