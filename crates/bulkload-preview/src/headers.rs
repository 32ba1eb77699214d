//! Column name normalization shared by the parsers

/// Name given to a header cell with no text
pub(crate) const EMPTY_HEADER: &str = "__EMPTY";

/// Ordered, distinct column names.
///
/// A repeated name gets a `_<n>` suffix with the smallest `n` that keeps the
/// set distinct, so `a, a, a` becomes `a, a_1, a_2`.
#[derive(Debug, Default)]
pub(crate) struct HeaderNames {
    names: Vec<String>,
    empty_placeholder: Option<&'static str>,
}

impl HeaderNames {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Headers where a blank cell is named [`EMPTY_HEADER`] instead of `""`
    pub(crate) fn with_empty_placeholder() -> Self {
        Self {
            names: Vec::new(),
            empty_placeholder: Some(EMPTY_HEADER),
        }
    }

    /// Append a raw header, returning the distinct name it was stored under
    pub(crate) fn push(&mut self, raw: &str) -> &str {
        let base = match self.empty_placeholder {
            Some(placeholder) if raw.is_empty() => placeholder,
            _ => raw,
        };

        let mut name = base.to_string();
        let mut suffix = 1;
        while self.names.contains(&name) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }

        self.names.push(name);
        self.names.last().map(String::as_str).unwrap_or_default()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.names
    }
}

impl<'a> FromIterator<&'a str> for HeaderNames {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut headers = HeaderNames::new();
        for raw in iter {
            headers.push(raw);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_get_suffixes() {
        let headers: HeaderNames = ["sku", "sku", "title", "sku"].into_iter().collect();
        assert_eq!(headers.into_vec(), vec!["sku", "sku_1", "title", "sku_2"]);
    }

    #[test]
    fn test_suffix_skips_taken_names() {
        let headers: HeaderNames = ["a_1", "a", "a"].into_iter().collect();
        assert_eq!(headers.into_vec(), vec!["a_1", "a", "a_2"]);
    }

    #[test]
    fn test_empty_headers_kept_verbatim() {
        let headers: HeaderNames = ["", "price"].into_iter().collect();
        assert_eq!(headers.get(0), Some(""));
    }

    #[test]
    fn test_empty_header_placeholder() {
        let mut headers = HeaderNames::with_empty_placeholder();
        for raw in ["", "price", ""] {
            headers.push(raw);
        }
        assert_eq!(headers.get(0), Some("__EMPTY"));
        assert_eq!(headers.get(2), Some("__EMPTY_1"));
        assert_eq!(headers.len(), 3);
    }
}
