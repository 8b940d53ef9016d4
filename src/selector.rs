use std::collections::BTreeSet;

use crate::language::LanguageDescriptor;

/// Which languages a catalog view exposes, in display order.
///
/// With a `preview` target (onboarding a language not yet used anywhere)
/// the view narrows to the source language plus the target. Otherwise
/// every language that already has catalog entries is shown. The source
/// language always sorts first; the rest sort by display name.
#[must_use]
pub fn select_languages_for_view(
    all: &[LanguageDescriptor],
    used_codes: &BTreeSet<String>,
    source_lang: &str,
    preview: Option<&LanguageDescriptor>,
) -> Vec<LanguageDescriptor> {
    let mut langs: Vec<LanguageDescriptor> = match preview {
        Some(target) => {
            let mut v: Vec<LanguageDescriptor> = all
                .iter()
                .filter(|l| l.code == source_lang)
                .cloned()
                .collect();
            if target.code != source_lang {
                v.push(target.clone());
            }
            v
        }
        None => all
            .iter()
            .filter(|l| used_codes.contains(&l.code))
            .cloned()
            .collect(),
    };
    langs.sort_by(|a, b| {
        (a.code != source_lang, &a.name).cmp(&(b.code != source_lang, &b.name))
    });
    langs
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::select_languages_for_view;
    use crate::language::LanguageDescriptor;

    fn all() -> Vec<LanguageDescriptor> {
        vec![
            LanguageDescriptor::new("en", "English", "🇬🇧"),
            LanguageDescriptor::new("ru", "Русский", "🇷🇺"),
            LanguageDescriptor::new("pl", "Polski", "🇵🇱"),
        ]
    }

    fn codes(langs: &[LanguageDescriptor]) -> Vec<&str> {
        langs.iter().map(|l| l.code.as_str()).collect()
    }

    #[test]
    fn source_first_then_alphabetical_by_name() {
        let used: BTreeSet<String> =
            ["en", "pl", "ru"].iter().map(|s| s.to_string()).collect();
        let langs = select_languages_for_view(&all(), &used, "ru", None);
        assert_eq!(codes(&langs), vec!["ru", "en", "pl"]);
    }

    #[test]
    fn steady_state_shows_only_used_languages() {
        let used: BTreeSet<String> = ["ru"].iter().map(|s| s.to_string()).collect();
        let langs = select_languages_for_view(&all(), &used, "ru", None);
        assert_eq!(codes(&langs), vec!["ru"]);
    }

    #[test]
    fn preview_narrows_to_source_plus_target() {
        let used: BTreeSet<String> =
            ["en", "ru"].iter().map(|s| s.to_string()).collect();
        let pl = LanguageDescriptor::new("pl", "Polski", "🇵🇱");
        let langs = select_languages_for_view(&all(), &used, "ru", Some(&pl));
        assert_eq!(codes(&langs), vec!["ru", "pl"]);
    }

    #[test]
    fn preview_of_source_language_is_deduplicated() {
        let used = BTreeSet::new();
        let ru = LanguageDescriptor::new("ru", "Русский", "🇷🇺");
        let langs = select_languages_for_view(&all(), &used, "ru", Some(&ru));
        assert_eq!(codes(&langs), vec!["ru"]);
    }
}
