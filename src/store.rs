use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;

use crate::catalog::{CatalogEntry, CatalogStore, LanguageDirectory};
use crate::language::LanguageDescriptor;

type Rows = BTreeMap<String, BTreeMap<String, String>>;

/// Catalog store backed by a JSON file of key -> lang -> text. The whole
/// map is held behind a mutex, so insert-if-absent is atomic per pair
/// within the process; every successful insert is written through.
pub struct JsonCatalogStore {
    path: PathBuf,
    rows: Mutex<Rows>,
}

impl JsonCatalogStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let rows: Rows = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read catalog: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parse catalog: {}", path.display()))?
        } else {
            Rows::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            rows: Mutex::new(rows),
        })
    }

    fn save(&self, rows: &Rows) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(rows).context("serialize catalog")?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("write catalog: {}", self.path.display()))
    }
}

impl CatalogStore for JsonCatalogStore {
    fn read_all(&self) -> anyhow::Result<Vec<CatalogEntry>> {
        let rows = self.rows.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut out = Vec::new();
        for (key, by_lang) in rows.iter() {
            for (lang, text) in by_lang {
                out.push(CatalogEntry {
                    key: key.clone(),
                    lang: lang.clone(),
                    text: text.clone(),
                });
            }
        }
        Ok(out)
    }

    fn insert_if_absent(&self, key: &str, lang: &str, text: &str) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let by_lang = rows.entry(key.to_string()).or_default();
        if by_lang.contains_key(lang) {
            return Ok(false);
        }
        by_lang.insert(lang.to_string(), text.to_string());
        if let Err(err) = self.save(&rows) {
            // Roll back so a retry after a transient write failure can
            // still win the pair instead of hitting a phantom row.
            if let Some(by_lang) = rows.get_mut(key) {
                by_lang.remove(lang);
                if by_lang.is_empty() {
                    rows.remove(key);
                }
            }
            return Err(err);
        }
        Ok(true)
    }
}

/// Language directory backed by a JSON array of descriptors. Read-only;
/// onboarding a new language is an operator edit of the file.
pub struct JsonLanguageDirectory {
    languages: Vec<LanguageDescriptor>,
}

impl JsonLanguageDirectory {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read languages: {}", path.display()))?;
        let languages: Vec<LanguageDescriptor> = serde_json::from_str(&text)
            .with_context(|| format!("parse languages: {}", path.display()))?;
        Ok(Self { languages })
    }
}

impl LanguageDirectory for JsonLanguageDirectory {
    fn read_all(&self) -> anyhow::Result<Vec<LanguageDescriptor>> {
        Ok(self.languages.clone())
    }
}

/// In-memory catalog store. Used by tests and by embedders that bring
/// their own persistence.
#[derive(Default)]
pub struct MemoryCatalogStore {
    rows: Mutex<Rows>,
}

impl CatalogStore for MemoryCatalogStore {
    fn read_all(&self) -> anyhow::Result<Vec<CatalogEntry>> {
        let rows = self.rows.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut out = Vec::new();
        for (key, by_lang) in rows.iter() {
            for (lang, text) in by_lang {
                out.push(CatalogEntry {
                    key: key.clone(),
                    lang: lang.clone(),
                    text: text.clone(),
                });
            }
        }
        Ok(out)
    }

    fn insert_if_absent(&self, key: &str, lang: &str, text: &str) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let by_lang = rows.entry(key.to_string()).or_default();
        if by_lang.contains_key(lang) {
            return Ok(false);
        }
        by_lang.insert(lang.to_string(), text.to_string());
        Ok(true)
    }
}

/// Fixed in-memory language directory for tests and embedders.
pub struct MemoryLanguageDirectory {
    languages: Vec<LanguageDescriptor>,
}

impl MemoryLanguageDirectory {
    #[must_use]
    pub fn new(languages: Vec<LanguageDescriptor>) -> Self {
        Self { languages }
    }
}

impl LanguageDirectory for MemoryLanguageDirectory {
    fn read_all(&self) -> anyhow::Result<Vec<LanguageDescriptor>> {
        Ok(self.languages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonCatalogStore, JsonLanguageDirectory};
    use crate::catalog::{CatalogStore, LanguageDirectory};

    #[test]
    fn json_store_round_trips_through_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");

        let store = JsonCatalogStore::open(&path).expect("open");
        assert!(store.insert_if_absent("greeting", "ru", "Привет").expect("insert"));
        assert!(store.insert_if_absent("greeting", "en", "Hello").expect("insert"));

        let reopened = JsonCatalogStore::open(&path).expect("reopen");
        let rows = reopened.read_all().expect("read");
        assert_eq!(rows.len(), 2);
        assert!(!reopened
            .insert_if_absent("greeting", "en", "Hi")
            .expect("dup insert"));
    }

    #[test]
    fn json_store_insert_if_absent_reports_duplicates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        let store = JsonCatalogStore::open(&path).expect("open");

        assert!(store.insert_if_absent("bye", "ru", "Пока").expect("first"));
        assert!(!store.insert_if_absent("bye", "ru", "Прощай").expect("second"));

        let rows = store.read_all().expect("read");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Пока");
    }

    #[test]
    fn failed_write_rolls_back_so_a_retry_can_persist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let parent = dir.path().join("data");
        let path = parent.join("catalog.json");

        // Parent directory does not exist yet, so the write-through fails.
        let store = JsonCatalogStore::open(&path).expect("open");
        assert!(store.insert_if_absent("greeting", "en", "Hello").is_err());
        assert!(store.read_all().expect("read").is_empty());

        std::fs::create_dir(&parent).expect("mkdir");
        assert!(store.insert_if_absent("greeting", "en", "Hello").expect("retry"));

        let reopened = JsonCatalogStore::open(&path).expect("reopen");
        let rows = reopened.read_all().expect("read");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Hello");
    }

    #[test]
    fn missing_catalog_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonCatalogStore::open(&dir.path().join("missing.json")).expect("open");
        assert!(store.read_all().expect("read").is_empty());
    }

    #[test]
    fn language_directory_parses_descriptor_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("languages.json");
        std::fs::write(
            &path,
            r#"[
                {"code": "ru", "name": "Русский", "emoji": "🇷🇺"},
                {"code": "en", "name": "Английский", "emoji": "🇬🇧", "available": false}
            ]"#,
        )
        .expect("write");

        let directory = JsonLanguageDirectory::open(&path).expect("open");
        let langs = directory.read_all().expect("read");
        assert_eq!(langs.len(), 2);
        assert!(langs[0].available);
        assert!(!langs[1].available);
        assert_eq!(langs[1].marker(), Some("🇬🇧"));
    }
}
