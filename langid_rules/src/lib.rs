//! Rule base text sanitizers for Langid.
//!
//! Sanitizers clean raw sentences before they are vectorized. A model records the name of the
//! sanitizer it was trained with, so that [`SanitizerKind`] can rebuild the same filter when
//! predicting.

pub mod string_filters;

use std::fmt;
use std::str::FromStr;

use string_filters::{NoopFilter, SanitizeV0Filter, SanitizeV1Filter, SanitizeV2Filter};

/// Filter that transforms a string.
pub trait StringFilter<S>
where
    S: AsRef<str>,
{
    /// Filters the specified string.
    ///
    /// # Arguments:
    ///
    /// * `string` - Input string.
    ///
    /// # Returns
    ///
    /// A processed string.
    fn filter(&self, string: S) -> String;
}

/// Available sanitizers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SanitizerKind {
    /// No sanitization.
    None,
    /// Lowercases and keeps letters, spaces, dots and commas.
    V0,
    /// Keeps letters, spaces, apostrophes and single punctuation marks.
    V1,
    /// Keeps letters and spaces.
    V2,
}

impl SanitizerKind {
    /// Builds the filter of this kind.
    pub fn build(self) -> Box<dyn for<'a> StringFilter<&'a str> + Send + Sync> {
        match self {
            Self::None => Box::new(NoopFilter::new()),
            Self::V0 => Box::new(SanitizeV0Filter::new()),
            Self::V1 => Box::new(SanitizeV1Filter::new()),
            Self::V2 => Box::new(SanitizeV2Filter::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::V0 => "v0",
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl fmt::Display for SanitizerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SanitizerKind {
    type Err = &'static str;
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "none" => Ok(Self::None),
            "v0" => Ok(Self::V0),
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            _ => Err("Could not parse a sanitizer name: {none, v0, v1, v2}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for kind in [
            SanitizerKind::None,
            SanitizerKind::V0,
            SanitizerKind::V1,
            SanitizerKind::V2,
        ] {
            assert_eq!(kind, kind.to_string().parse().unwrap());
        }
        assert!("v3".parse::<SanitizerKind>().is_err());
    }

    #[test]
    fn test_build() {
        let text = "Grüezi 123 mitenand!";
        assert_eq!(text, SanitizerKind::None.build().filter(text));
        assert_eq!("grüezi mitenand", SanitizerKind::V0.build().filter(text));
        assert_eq!("Grüezi mitenand", SanitizerKind::V1.build().filter(text));
        assert_eq!("Grüezi mitenand", SanitizerKind::V2.build().filter(text));
    }
}
