use std::fmt;

/// A BCP 47 language tag, e.g. `en-US`.
///
/// Carried as part of the reporter settings and attached to report log
/// lines; documents themselves are locale-independent JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The platform locale from `LC_ALL` / `LC_MESSAGES` / `LANG`, falling back to `en-US`.
    pub fn system() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| Self::from_posix(&value))
            .unwrap_or_else(|| Self::new("en-US"))
    }

    /// Parse a POSIX locale such as `de_DE.UTF-8@euro` into `de-DE`.
    ///
    /// Returns `None` for empty values and the `C`/`POSIX` locales.
    pub fn from_posix(value: &str) -> Option<Self> {
        let tag = value
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim();
        if tag.is_empty() || tag == "C" || tag == "POSIX" {
            return None;
        }
        Some(Self(tag.replace('_', "-")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
