use std::collections::BTreeMap;
use std::path::Path;

use log::info;

use crate::error::ConfigError;

/// Mapping of case-normalized category name to its ordered keyword list.
///
/// Loaded once at startup and rewritten wholesale whenever the operator
/// introduces a new category. Concurrent access is the caller's job: the
/// pipeline shares one store behind an `RwLock` so reads (label matching)
/// and the occasional write (operator-added category) never race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStore {
    categories: BTreeMap<String, Vec<String>>,
}

impl CategoryStore {
    /// Built-in starter set used when no category file exists yet.
    pub fn default_set() -> Self {
        let mut categories = BTreeMap::new();
        for (name, keywords) in [
            ("academic", vec!["research", "thesis", "paper", "study"]),
            ("finance", vec!["invoice", "receipt", "bank", "statement"]),
            ("developer", vec!["code", "script", "program", "software"]),
            ("personal", vec!["photo", "music", "video", "diary"]),
            ("business", vec!["contract", "agreement", "proposal", "report"]),
        ] {
            categories.insert(
                name.to_string(),
                keywords.into_iter().map(str::to_string).collect(),
            );
        }
        Self { categories }
    }

    /// Loads the store from a JSON file. A missing file falls back to the
    /// built-in defaults; a malformed file is a hard error so a typo in
    /// the category file cannot silently disable classification.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No category file at {}, starting with the default set",
                    path.display()
                );
                return Ok(Self::default_set());
            }
            Err(e) => {
                return Err(ConfigError::ReadFile {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)?;
        let categories = raw
            .into_iter()
            .map(|(name, keywords)| (normalize(&name), keywords))
            .collect();

        Ok(Self { categories })
    }

    /// Rewrites the category file wholesale.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let body = serde_json::to_string_pretty(&self.categories)?;
        std::fs::write(path, body).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Adds a category with an empty keyword set. Returns true if the
    /// name was new. Existing categories are never modified or removed.
    pub fn add(&mut self, name: &str) -> bool {
        let name = normalize(name);
        if self.categories.contains_key(&name) {
            return false;
        }
        self.categories.insert(name, Vec::new());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(&normalize(name))
    }

    /// Matches a predicted label against the known category names: a
    /// category matches if its name is contained in the label.
    pub fn match_label(&self, label: &str) -> Option<String> {
        let label = label.to_lowercase();
        self.categories
            .keys()
            .find(|name| label.contains(name.as_str()))
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = CategoryStore::load(&tmp.path().join("categories.json")).unwrap();

        assert_eq!(store, CategoryStore::default_set());
        assert!(store.contains("finance"));
        assert!(store.contains("academic"));
    }

    #[test]
    fn test_malformed_file_is_a_hard_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("categories.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            CategoryStore::load(&path),
            Err(ConfigError::ParseJson(_))
        ));
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("categories.json");

        let mut store = CategoryStore::default_set();
        store.add("Legal");
        store.save(&path).unwrap();

        let reloaded = CategoryStore::load(&path).unwrap();
        assert_eq!(store, reloaded);
        assert!(reloaded.contains("legal"));
    }

    #[test]
    fn test_add_normalizes_and_is_idempotent() {
        let mut store = CategoryStore::default_set();

        assert!(store.add("  Legal "));
        assert!(store.contains("legal"));
        assert!(!store.add("LEGAL"));

        let keywords: Vec<String> = store
            .iter()
            .find(|(name, _)| name.as_str() == "legal")
            .map(|(_, kw)| kw.clone())
            .unwrap();
        assert!(keywords.is_empty(), "new categories start with no keywords");
    }

    #[test]
    fn test_match_label_by_containment() {
        let store = CategoryStore::default_set();

        assert_eq!(
            store.match_label("finance_documents"),
            Some("finance".to_string())
        );
        assert_eq!(store.match_label("FINANCE"), Some("finance".to_string()));
        assert_eq!(store.match_label("unrelated"), None);
    }

    #[test]
    fn test_load_normalizes_names() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("categories.json");
        std::fs::write(&path, r#"{"Finance": ["invoice"]}"#).unwrap();

        let store = CategoryStore::load(&path).unwrap();
        assert!(store.contains("finance"));
    }
}
