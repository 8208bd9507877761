// ── Filter vocabularies ──
//
// Each listing exposes a closed set of content-type filters. `all` is the
// default everywhere and means "no query parameter".

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// The filter value meaning "unfiltered".
pub const ALL_FILTER: &str = "all";

/// A per-view closed filter vocabulary.
pub trait FilterValue:
    Copy
    + Eq
    + Hash
    + Default
    + fmt::Debug
    + fmt::Display
    + FromStr
    + IntoEnumIterator
    + Into<&'static str>
    + Send
    + Sync
    + 'static
{
    /// Wire value, as sent in `contentType=`.
    fn as_str(self) -> &'static str {
        self.into()
    }

    fn is_all(self) -> bool {
        self.as_str() == ALL_FILTER
    }

    /// Every accepted value, for help text and validation messages.
    fn vocabulary() -> Vec<&'static str> {
        Self::iter().map(FilterValue::as_str).collect()
    }
}

/// The user listing has no filter; its vocabulary is just `all`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Unfiltered {
    #[default]
    All,
}

impl FilterValue for Unfiltered {}

/// Text/link code listing filter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TextFilter {
    #[default]
    All,
    Text,
    Link,
}

impl FilterValue for TextFilter {}

/// File code listing filter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FileFilter {
    #[default]
    All,
    Pdf,
    Image,
}

impl FilterValue for FileFilter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all() {
        assert!(TextFilter::default().is_all());
        assert!(FileFilter::default().is_all());
        assert!(Unfiltered::default().is_all());
    }

    #[test]
    fn vocabularies_are_closed() {
        assert_eq!(TextFilter::vocabulary(), vec!["all", "text", "link"]);
        assert_eq!(FileFilter::vocabulary(), vec!["all", "pdf", "image"]);
        assert_eq!(Unfiltered::vocabulary(), vec!["all"]);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("LINK".parse::<TextFilter>().ok(), Some(TextFilter::Link));
        assert_eq!("pdf".parse::<FileFilter>().ok(), Some(FileFilter::Pdf));
        assert!("video".parse::<FileFilter>().is_err());
    }
}
