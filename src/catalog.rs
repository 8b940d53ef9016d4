use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::language::LanguageDescriptor;

/// One catalog row. Identity is the (key, lang) pair.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: String,
    pub lang: String,
    pub text: String,
}

/// Keyed read/write surface of the catalog storage collaborator.
///
/// `insert_if_absent` must be atomic per (key, lang) pair: concurrent
/// attempts for the same pair resolve to exactly one winner, the rest
/// become no-ops. No update or delete operation is required.
pub trait CatalogStore {
    fn read_all(&self) -> anyhow::Result<Vec<CatalogEntry>>;

    /// Returns true when a new row was added, false when the pair already
    /// had an entry (which is left untouched).
    fn insert_if_absent(&self, key: &str, lang: &str, text: &str) -> anyhow::Result<bool>;
}

/// Directory of known languages.
pub trait LanguageDirectory {
    fn read_all(&self) -> anyhow::Result<Vec<LanguageDescriptor>>;
}

/// In-memory view of the full catalog, rebuilt from the store on demand so
/// derived numbers can never drift from the underlying rows.
#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
    texts: BTreeMap<String, BTreeMap<String, String>>,
    used_langs: BTreeSet<String>,
}

impl CatalogSnapshot {
    #[must_use]
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut texts: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut used_langs = BTreeSet::new();
        for entry in entries {
            used_langs.insert(entry.lang.clone());
            texts
                .entry(entry.key)
                .or_default()
                .entry(entry.lang)
                .or_insert(entry.text);
        }
        Self { texts, used_langs }
    }

    #[must_use]
    pub fn text(&self, key: &str, lang: &str) -> Option<&str> {
        self.texts.get(key).and_then(|by_lang| by_lang.get(lang)).map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, key: &str, lang: &str) -> bool {
        self.text(key, lang).is_some()
    }

    /// Language codes with at least one entry of any key.
    #[must_use]
    pub fn used_language_codes(&self) -> &BTreeSet<String> {
        &self.used_langs
    }

    /// Keys that have an entry for `lang`.
    #[must_use]
    pub fn keys_for(&self, lang: &str) -> BTreeSet<String> {
        self.texts
            .iter()
            .filter(|(_, by_lang)| by_lang.contains_key(lang))
            .map(|(key, _)| key.clone())
            .collect()
    }
}
