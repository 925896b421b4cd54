use regex::Regex;

use crate::string_filters::collapse_whitespace;
use crate::StringFilter;

/// Keeps letters, spaces, apostrophes, dots and commas, then tidies up the punctuation left over.
///
/// Apostrophes that are not attached to a word are dropped, leading punctuation is removed,
/// separators before a dot or comma are removed and runs of dots and commas become one dot.
/// Letter case is preserved.
pub struct SanitizeV1Filter {
    non_letters: Regex,
    lost_quotes: Regex,
    leading: Regex,
    before_punct: Regex,
    punct_runs: Regex,
}

impl SanitizeV1Filter {
    /// Creates a new SanitizeV1Filter.
    ///
    /// # Returns
    ///
    /// A new SanitizeV1Filter.
    pub fn new() -> Self {
        Self {
            non_letters: Regex::new(r"[^\w \.,']|\d").unwrap(),
            lost_quotes: Regex::new(r"([^\w]|[, \.])'([^\w]|[, \.])").unwrap(),
            leading: Regex::new(r"^([^\w]|[, \.])+").unwrap(),
            before_punct: Regex::new(r"([^\w]|[_, ])+([\.,]+)").unwrap(),
            punct_runs: Regex::new(r"[,\.][,\.]+").unwrap(),
        }
    }
}

impl Default for SanitizeV1Filter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StringFilter<S> for SanitizeV1Filter
where
    S: AsRef<str>,
{
    fn filter(&self, string: S) -> String {
        // UTF-8 right single quotation mark decoded as cp1252
        let text = string.as_ref().replace("â€™", "'");
        let text = self.non_letters.replace_all(&text, " ");
        let text = self.lost_quotes.replace_all(&text, "${1}${2}");
        let text = self.leading.replace(&text, "");
        let text = self.before_punct.replace_all(&text, "${2}");
        let text = self.punct_runs.replace_all(&text, ".");
        collapse_whitespace(&text)
    }
}
