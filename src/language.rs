use serde::{Deserialize, Serialize};

/// A language the system knows about. `name` is the display name in the
/// source language; `available` gates whether the language may be offered
/// for onboarding, not whether it already has catalog entries.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LanguageDescriptor {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl LanguageDescriptor {
    #[must_use]
    pub fn new(code: &str, name: &str, emoji: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            emoji: emoji.to_string(),
            available: true,
        }
    }

    /// The flag marker for this language, if one is registered.
    #[must_use]
    pub fn marker(&self) -> Option<&str> {
        let m = self.emoji.trim();
        if m.is_empty() {
            None
        } else {
            Some(m)
        }
    }
}
