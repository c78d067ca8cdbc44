use crate::api_client::UploadResult;
use chrono::NaiveDate;

/// Builds the dated container name, e.g. `BandOfBrothers-2024-09-12`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ffpics::foundation::utils::container_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 9, 12).unwrap();
/// assert_eq!(container_name("BandOfBrothers", date), "BandOfBrothers-2024-09-12");
/// ```
pub fn container_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}", prefix, date.format("%Y-%m-%d"))
}

/// Renders the league note template.
///
/// The optional description comes first, followed by one numbered block per
/// upload in the order given. ESPN markup centers each image.
///
/// # Examples
///
/// ```
/// use ffpics::foundation::utils::render_template;
///
/// assert_eq!(render_template(None, &[]), "");
/// ```
pub fn render_template(description: Option<&str>, results: &[UploadResult]) -> String {
    let mut template = String::new();

    if let Some(description) = description.filter(|d| !d.is_empty()) {
        template.push_str(description);
        template.push_str("\n\n");
    }

    for (index, result) in results.iter().enumerate() {
        template.push_str(&format!(
            "{}. \n[center][image]{}[/image]\n[/center]\n\n\n",
            index + 1,
            result.link
        ));
    }

    template
}
