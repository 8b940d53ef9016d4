use crate::language::LanguageDescriptor;

/// Sentinel standing in for a language flag glyph while text is out for
/// translation. Not producible in normal catalog text.
pub const FLAG: &str = "<<LX_FLAG>>";

/// Replace a flag marker in `text` with the [`FLAG`] sentinel so it
/// survives the round trip through the translation capability.
///
/// The text is scanned against the full marker table; a marker qualifies
/// when it is preceded by a space or sits at the end of the string. Only
/// the first qualifying occurrence is substituted per call; further
/// occurrences are left as-is. Absence of a match leaves the text
/// unchanged. Never fails.
#[must_use]
pub fn encode(text: &str, languages: &[LanguageDescriptor]) -> String {
    for lang in languages {
        let Some(marker) = lang.marker() else {
            continue;
        };
        let spaced = format!(" {marker}");
        if let Some(pos) = text.find(&spaced) {
            let mut out = String::with_capacity(text.len() + FLAG.len());
            out.push_str(&text[..pos]);
            out.push(' ');
            out.push_str(FLAG);
            out.push_str(&text[pos + spaced.len()..]);
            return out;
        }
        if text.ends_with(marker) {
            let cut = text.len() - marker.len();
            let mut out = String::with_capacity(cut + FLAG.len());
            out.push_str(&text[..cut]);
            out.push_str(FLAG);
            return out;
        }
    }
    text.to_string()
}

/// Replace every sentinel with the target language's marker, falling back
/// to the upper-cased language code when no marker is registered.
///
/// Not an inverse of [`encode`]: the translated sentence surfaces the
/// destination language's flag, not the flag the original carried.
#[must_use]
pub fn decode(text: &str, target: &LanguageDescriptor) -> String {
    if !text.contains(FLAG) {
        return text.to_string();
    }
    match target.marker() {
        Some(marker) => text.replace(FLAG, marker),
        None => text.replace(FLAG, &target.code.to_uppercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, FLAG};
    use crate::language::LanguageDescriptor;

    fn table() -> Vec<LanguageDescriptor> {
        vec![
            LanguageDescriptor::new("ru", "Русский", "🇷🇺"),
            LanguageDescriptor::new("en", "Английский", "🇬🇧"),
            LanguageDescriptor::new("eo", "Эсперанто", ""),
        ]
    }

    #[test]
    fn encode_substitutes_space_preceded_marker() {
        let out = encode("Добро пожаловать 🇷🇺 в чат", &table());
        assert_eq!(out, format!("Добро пожаловать {FLAG} в чат"));
    }

    #[test]
    fn encode_substitutes_trailing_marker() {
        let out = encode("Чат поддержки🇬🇧", &table());
        assert_eq!(out, format!("Чат поддержки{FLAG}"));
    }

    #[test]
    fn encode_takes_only_first_qualifying_occurrence() {
        let out = encode("Чат 🇷🇺 и снова 🇷🇺", &table());
        assert_eq!(out, format!("Чат {FLAG} и снова 🇷🇺"));
    }

    #[test]
    fn encode_without_marker_leaves_text_unchanged() {
        let text = "Напишите {text} модератору {moderator}\\n\\nСпасибо";
        assert_eq!(encode(text, &table()), text);
    }

    #[test]
    fn decode_swaps_in_target_marker() {
        let en = LanguageDescriptor::new("en", "Английский", "🇬🇧");
        let out = decode(&format!("Welcome {FLAG} to the chat"), &en);
        assert_eq!(out, "Welcome 🇬🇧 to the chat");
    }

    #[test]
    fn decode_falls_back_to_uppercased_code() {
        let eo = LanguageDescriptor::new("eo", "Эсперанто", "");
        let out = decode(&format!("Bonvenon {FLAG}"), &eo);
        assert_eq!(out, "Bonvenon EO");
    }

    #[test]
    fn decode_replaces_every_sentinel() {
        let en = LanguageDescriptor::new("en", "Английский", "🇬🇧");
        let out = decode(&format!("{FLAG} and {FLAG}"), &en);
        assert_eq!(out, "🇬🇧 and 🇬🇧");
    }

    #[test]
    fn round_trip_preserves_placeholders_and_newlines() {
        let en = LanguageDescriptor::new("en", "Английский", "🇬🇧");
        let text = "Привет, {text}!\\nВаш модератор: {moderator}";
        assert_eq!(decode(&encode(text, &table()), &en), text);
    }
}
