//! Engine settings read from the environment.

const DEFAULT_ID_SPACE_SEPARATOR: &str = ".";

/// Separator between an id space and a local widget id. From env `WIDGET_ID_SPACE_SEPARATOR`, default `.`.
/// Values that could appear inside a local id are ignored.
pub fn id_space_separator() -> String {
    match std::env::var("WIDGET_ID_SPACE_SEPARATOR") {
        Ok(s) if is_valid_separator(&s) => s,
        Ok(s) if !s.is_empty() => {
            tracing::warn!(separator = %s, "WIDGET_ID_SPACE_SEPARATOR may occur in widget ids, using '.'");
            DEFAULT_ID_SPACE_SEPARATOR.into()
        }
        _ => DEFAULT_ID_SPACE_SEPARATOR.into(),
    }
}

/// A separator must not contain characters allowed in local ids (letters, digits, `_`, `-`),
/// otherwise `space` + `id` could compose to the same full id as a plain root id.
pub fn is_valid_separator(separator: &str) -> bool {
    !separator.is_empty()
        && !separator
            .chars()
            .any(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Prefix for autogenerated widget ids. From env `WIDGET_AUTO_ID_PREFIX`, default empty.
pub fn auto_id_prefix() -> String {
    std::env::var("WIDGET_AUTO_ID_PREFIX").unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineSettings {
    pub id_space_separator: String,
    pub auto_id_prefix: String,
}

impl EngineSettings {
    pub fn from_env() -> Self {
        EngineSettings {
            id_space_separator: id_space_separator(),
            auto_id_prefix: auto_id_prefix(),
        }
    }

    /// Falls back to the default separator if the configured one is not usable.
    pub fn sanitized(mut self) -> Self {
        if !is_valid_separator(&self.id_space_separator) {
            tracing::warn!(separator = %self.id_space_separator, "unusable id space separator, using '.'");
            self.id_space_separator = DEFAULT_ID_SPACE_SEPARATOR.into();
        }
        self
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            id_space_separator: DEFAULT_ID_SPACE_SEPARATOR.into(),
            auto_id_prefix: String::new(),
        }
    }
}
