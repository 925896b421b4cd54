use crate::StringFilter;

/// Filter that returns its input unchanged.
pub struct NoopFilter;

impl NoopFilter {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for NoopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StringFilter<S> for NoopFilter
where
    S: AsRef<str>,
{
    fn filter(&self, string: S) -> String {
        string.as_ref().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop() {
        let filter = NoopFilter::new();
        assert_eq!("  Hallo, 42!  ", filter.filter("  Hallo, 42!  "));
    }
}
