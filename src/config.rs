use anyhow::Context;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const BACKEND_URL_VAR: &str = "PLAGIARISM_BACKEND_URL";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Runtime settings. Command-line flags win over the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    database_url: Option<String>,
}

impl Config {
    pub fn resolve(backend_url: Option<String>, database_url: Option<String>) -> Self {
        Self::from_lookup(backend_url, database_url, |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(backend_url: Option<String>, database_url: Option<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: String| (!value.trim().is_empty()).then_some(value);

        Self {
            backend_url: backend_url
                .and_then(non_empty)
                .or_else(|| lookup(BACKEND_URL_VAR).and_then(non_empty))
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            database_url: database_url
                .and_then(non_empty)
                .or_else(|| lookup(DATABASE_URL_VAR).and_then(non_empty)),
        }
    }

    /// Only commands touching the session store need a database.
    pub fn database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set to a Postgres instance holding session results")
    }
}
