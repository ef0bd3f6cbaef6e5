/// Text and tag predicates for a listing. Both are optional and ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    text: String,
    tags: Vec<String>,
}

impl ListFilters {
    /// Normalizes input: the term is trimmed and blank tags are dropped.
    pub fn new(text: impl Into<String>, tags: impl IntoIterator<Item = String>) -> Self {
        let text = text.into().trim().to_owned();
        let tags = tags
            .into_iter()
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect();
        Self { text, tags }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn is_unfiltered(&self) -> bool {
        !self.has_text() && !self.has_tags()
    }
}
