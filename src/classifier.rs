//! Pure filename classification against the configured category rules.

use crate::config::Config;

/// Returns the name of the first category whose suffix set matches, or
/// `None` when the file is unclassified.
///
/// The filename is lower-cased and compared against each rule's (already
/// lower-cased) suffixes with a literal ends-with check. A suffix is the
/// trailing text of the name, not a parsed extension, so a rule declaring
/// `.tar.gz` takes `backup.tar.gz` away from a later rule declaring `.gz`.
/// Rule order is match priority.
///
/// # Examples
///
/// ```
/// use sortbox::config::Config;
/// use sortbox::classifier::classify;
///
/// let config = Config::from_json(
///     r#"{"categories": {"Images": [".jpg"], "Documents": [".pdf"]}}"#,
/// ).unwrap();
///
/// assert_eq!(classify("photo.JPG", &config), Some("Images"));
/// assert_eq!(classify("report.pdf", &config), Some("Documents"));
/// assert_eq!(classify("README", &config), None);
/// ```
pub fn classify<'c>(file_name: &str, config: &'c Config) -> Option<&'c str> {
    let lower = file_name.to_lowercase();
    config
        .rules
        .iter()
        .find(|rule| rule.suffixes.iter().any(|suffix| lower.ends_with(suffix)))
        .map(|rule| rule.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> Config {
        Config::from_json(json).expect("test config should parse")
    }

    #[test]
    fn test_classify_by_suffix() {
        let config = config(
            r#"{"categories": {
                "Documents": [".pdf"],
                "Images": [".jpg"],
                "Audio": [".mp3"]
            }}"#,
        );

        assert_eq!(classify("report.pdf", &config), Some("Documents"));
        assert_eq!(classify("photo.jpg", &config), Some("Images"));
        assert_eq!(classify("song.mp3", &config), Some("Audio"));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let config = config(r#"{"categories": {"Images": [".jpg"]}}"#);

        assert_eq!(classify("photo.JPG", &config), Some("Images"));
        assert_eq!(classify("PHOTO.Jpg", &config), Some("Images"));
    }

    #[test]
    fn test_unmatched_file_is_unclassified() {
        let config = config(r#"{"categories": {"Images": [".jpg"]}}"#);

        assert_eq!(classify("README", &config), None);
        assert_eq!(classify("archive.zip", &config), None);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Both rules claim .gz; declaration order decides.
        let config = config(
            r#"{"categories": {"First": [".gz"], "Second": [".gz"]}}"#,
        );

        assert_eq!(classify("data.gz", &config), Some("First"));
    }

    #[test]
    fn test_longer_suffix_declared_first_beats_shorter() {
        let config = config(
            r#"{"categories": {"Tarballs": [".tar.gz"], "Archives": [".gz"]}}"#,
        );

        assert_eq!(classify("backup.tar.gz", &config), Some("Tarballs"));
        assert_eq!(classify("single.gz", &config), Some("Archives"));
    }

    #[test]
    fn test_suffix_is_literal_trailing_text_not_extension() {
        let config = config(r#"{"categories": {"Backups": [".pdf.bak"]}}"#);

        assert_eq!(classify("report.pdf.bak", &config), Some("Backups"));
        assert_eq!(classify("report.pdf", &config), None);
    }

    #[test]
    fn test_suffix_must_match_at_end() {
        let config = config(r#"{"categories": {"Documents": [".pdf"]}}"#);

        assert_eq!(classify("not.pdf.txt", &config), None);
    }

    #[test]
    fn test_empty_rule_set_classifies_nothing() {
        let config = config(r#"{"categories": {}}"#);

        assert_eq!(classify("report.pdf", &config), None);
    }
}
