//! Text helpers shared by the indexers and filters.

/// Turn a catalog key such as `unlock_all_spells` into `Unlock All Spells`.
pub fn format_name(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase, space-joined concatenation of the fields a record is matched on.
pub fn search_blob(parts: &[&str]) -> String {
    parts.join(" ").to_lowercase()
}

/// A search term, lowercased once when it is captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Empty terms match everything; otherwise plain substring containment.
    pub fn matches(&self, blob: &str) -> bool {
        self.0.is_empty() || blob.contains(self.0.as_str())
    }
}

impl From<Option<&str>> for SearchTerm {
    fn from(raw: Option<&str>) -> Self {
        raw.map(Self::new).unwrap_or_default()
    }
}
