use std::collections::BTreeMap;

use crate::catalog::CatalogStore;
use crate::error::EngineResult;

/// Write a key -> text mapping into the catalog for `lang`, first-write
/// wins.
///
/// Blank texts are skipped (not persisted, not counted). An existing
/// (key, lang) pair is a silent no-op; repeated runs over the same
/// language can only add previously-missing keys, never regress an entry.
/// The returned count is the number of rows actually added, which callers
/// must treat as authoritative.
pub fn commit(
    store: &dyn CatalogStore,
    lang: &str,
    texts: &BTreeMap<String, String>,
) -> EngineResult<usize> {
    let mut added = 0usize;
    for (key, text) in texts {
        if text.trim().is_empty() {
            continue;
        }
        if store.insert_if_absent(key, lang, text)? {
            added += 1;
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::commit;
    use crate::catalog::CatalogStore;
    use crate::store::MemoryCatalogStore;

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn commit_counts_only_rows_actually_added() {
        let store = MemoryCatalogStore::default();
        store
            .insert_if_absent("greeting", "en", "Hello")
            .expect("seed");

        let added = commit(
            &store,
            "en",
            &mapping(&[("greeting", "Hi"), ("bye", "Goodbye")]),
        )
        .expect("commit");
        assert_eq!(added, 1);
    }

    #[test]
    fn commit_never_overwrites_an_existing_pair() {
        let store = MemoryCatalogStore::default();
        store
            .insert_if_absent("greeting", "en", "Hello")
            .expect("seed");

        commit(&store, "en", &mapping(&[("greeting", "Hi")])).expect("commit");

        let rows = store.read_all().expect("read");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Hello");
    }

    #[test]
    fn commit_is_idempotent() {
        let store = MemoryCatalogStore::default();
        let texts = mapping(&[("greeting", "Hello"), ("bye", "Goodbye")]);

        assert_eq!(commit(&store, "en", &texts).expect("first"), 2);
        let after_first = store.read_all().expect("read");

        assert_eq!(commit(&store, "en", &texts).expect("second"), 0);
        assert_eq!(store.read_all().expect("read"), after_first);
    }

    #[test]
    fn blank_texts_are_skipped_and_not_counted() {
        let store = MemoryCatalogStore::default();
        let added = commit(
            &store,
            "en",
            &mapping(&[("greeting", "   "), ("bye", ""), ("rules", "Rules")]),
        )
        .expect("commit");
        assert_eq!(added, 1);
        assert_eq!(store.read_all().expect("read").len(), 1);
    }

    #[test]
    fn same_key_for_another_language_is_a_fresh_row() {
        let store = MemoryCatalogStore::default();
        commit(&store, "en", &mapping(&[("greeting", "Hello")])).expect("en");
        let added = commit(&store, "pl", &mapping(&[("greeting", "Cześć")])).expect("pl");
        assert_eq!(added, 1);
        assert_eq!(store.read_all().expect("read").len(), 2);
    }
}
