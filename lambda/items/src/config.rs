/// Where item rows are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Backend {
    DynamoDb,
    /// Process-local rows, for running the function without a table.
    Memory,
}

/// Settings read once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub backend: Backend,
    pub table_name: String,
    pub allow_origin: String,
    /// Header carrying the caller's identity. Logged, never enforced.
    pub identity_header: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::DynamoDb,
            table_name: "KaimonoList".to_string(),
            allow_origin: "*".to_string(),
            identity_header: "x-user-id".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str, default: String| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
        };
        let backend = match lookup("ITEM_STORE").as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("memory") => Backend::Memory,
            _ => defaults.backend,
        };
        Self {
            backend,
            table_name: var("TABLE_NAME", defaults.table_name),
            allow_origin: var("ALLOW_ORIGIN", defaults.allow_origin),
            identity_header: var("IDENTITY_HEADER", defaults.identity_header).to_ascii_lowercase(),
        }
    }
}
