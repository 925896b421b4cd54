use regex::Regex;

use crate::string_filters::collapse_whitespace;
use crate::StringFilter;

/// Lowercases the text and replaces every character other than letters, spaces, dots and commas
/// with a space. Digits and underscores are replaced too.
pub struct SanitizeV0Filter {
    non_letters: Regex,
}

impl SanitizeV0Filter {
    /// Creates a new SanitizeV0Filter.
    ///
    /// # Returns
    ///
    /// A new SanitizeV0Filter.
    pub fn new() -> Self {
        Self {
            non_letters: Regex::new(r"[^\w \.,]|\d|_").unwrap(),
        }
    }
}

impl Default for SanitizeV0Filter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StringFilter<S> for SanitizeV0Filter
where
    S: AsRef<str>,
{
    fn filter(&self, string: S) -> String {
        let text = string.as_ref().to_lowercase();
        let text = self.non_letters.replace_all(&text, " ");
        collapse_whitespace(&text)
    }
}
