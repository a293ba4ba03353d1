use serde::Deserialize;

/// `?page=<n>` on paginated listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Build from decoded query pairs. A repeated `page` key keeps its last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let page = pairs
            .into_iter()
            .filter(|(key, _)| key == "page")
            .map(|(_, value)| value)
            .last();
        Self { page }
    }

    /// The requested page number; anything non-numeric counts as absent.
    pub fn number(&self) -> Option<i64> {
        self.page.as_deref().and_then(|p| p.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_numbers_and_ignores_garbage() {
        let q = |p: Option<&str>| PageQuery { page: p.map(str::to_string) }.number();

        assert_eq!(q(Some("2")), Some(2));
        assert_eq!(q(Some("-3")), Some(-3));
        assert_eq!(q(Some("last")), None);
        assert_eq!(q(None), None);
    }

    #[test]
    fn repeated_page_key_keeps_last_value() {
        let query = PageQuery::from_pairs(pairs(&[("page", "1"), ("sort", "new"), ("page", "2")]));

        assert_eq!(query.number(), Some(2));
    }

    #[test]
    fn missing_page_key_is_absent() {
        let query = PageQuery::from_pairs(pairs(&[("q", "cats")]));

        assert_eq!(query.page, None);
        assert_eq!(query.number(), None);
    }
}
