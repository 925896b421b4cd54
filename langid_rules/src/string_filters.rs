//! Filters for sentences given as [`&str`].

mod noop;
mod sanitize_v0;
mod sanitize_v1;
mod sanitize_v2;

pub use noop::NoopFilter;
pub use sanitize_v0::SanitizeV0Filter;
pub use sanitize_v1::SanitizeV1Filter;
pub use sanitize_v2::SanitizeV2Filter;

/// Replaces each run of whitespace with a single space and trims both ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!("a b c", collapse_whitespace("  a \t b\n\nc "));
        assert_eq!("", collapse_whitespace(" \n "));
    }
}
