use serde::{Deserialize, Serialize};

/// Supported mapping file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Proguard,
    TinyV1,
    TinyV2,
    TsrgV1,
}

impl Format {
    /// Get format name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Proguard => "proguard",
            Format::TinyV1 => "tiny-v1",
            Format::TinyV2 => "tiny-v2",
            Format::TsrgV1 => "tsrg-v1",
        }
    }
}

/// Guess the format from the first non-blank line.
///
/// Advisory only — the loaders stay explicit. The Tiny formats announce
/// themselves in their header; Proguard class lines end in `:` with a
/// ` -> ` arrow; TSRG class lines are two bare space-separated columns.
pub fn detect_format<I, S>(lines: I) -> Option<Format>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let first = lines
        .into_iter()
        .map(|line| line.as_ref().to_string())
        .find(|line| !line.trim().is_empty())?;

    if first.starts_with("tiny\t2") {
        return Some(Format::TinyV2);
    }
    if first.starts_with("v1\t") {
        return Some(Format::TinyV1);
    }
    if first.contains(" -> ") && first.ends_with(':') {
        return Some(Format::Proguard);
    }
    if !first.starts_with('\t') && !first.contains("->") && first.split(' ').count() == 2 {
        return Some(Format::TsrgV1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_each_header_shape() {
        assert_eq!(
            detect_format("tiny\t2\t0\tofficial\tnamed".lines()),
            Some(Format::TinyV2)
        );
        assert_eq!(
            detect_format("v1\tofficial\tnamed".lines()),
            Some(Format::TinyV1)
        );
        assert_eq!(
            detect_format("com.example.Engine -> a:".lines()),
            Some(Format::Proguard)
        );
        assert_eq!(
            detect_format("a/b/Engine x/y/Engine".lines()),
            Some(Format::TsrgV1)
        );
    }

    #[test]
    fn skips_leading_blank_lines() {
        assert_eq!(
            detect_format("\n\ncom.example.Engine -> a:".lines()),
            Some(Format::Proguard)
        );
    }

    #[test]
    fn unknown_input_detects_nothing() {
        assert_eq!(detect_format("one two three".lines()), None);
        assert_eq!(detect_format("".lines()), None);
    }

    #[test]
    fn format_names() {
        assert_eq!(Format::Proguard.as_str(), "proguard");
        assert_eq!(Format::TinyV2.as_str(), "tiny-v2");
    }
}
