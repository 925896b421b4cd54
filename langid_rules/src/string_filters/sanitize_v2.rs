use regex::Regex;

use crate::string_filters::collapse_whitespace;
use crate::StringFilter;

/// Replaces every character other than letters and spaces with a space.
pub struct SanitizeV2Filter {
    non_letters: Regex,
}

impl SanitizeV2Filter {
    /// Creates a new SanitizeV2Filter.
    ///
    /// # Returns
    ///
    /// A new SanitizeV2Filter.
    pub fn new() -> Self {
        Self {
            non_letters: Regex::new(r"[^\w ]|\d|_").unwrap(),
        }
    }
}

impl Default for SanitizeV2Filter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StringFilter<S> for SanitizeV2Filter
where
    S: AsRef<str>,
{
    fn filter(&self, string: S) -> String {
        let text = self.non_letters.replace_all(string.as_ref(), " ");
        collapse_whitespace(&text)
    }
}
