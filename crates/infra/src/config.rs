//! Backend configuration loading.
//!
//! Values come from the environment. A missing or placeholder backend is a
//! supported mode (local development): availability then reads as empty.

pub const REST_URL_VAR: &str = "SUPABASE_URL";
pub const REST_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

const REST_URL_PLACEHOLDER: &str = "your-supabase-url";

/// Which backend availability reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// PostgREST endpoint plus anonymous API key.
    Rest { url: String, api_key: String },
    /// Direct Postgres connection string.
    Postgres { url: String },
    /// No usable backend.
    Unconfigured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    backend: BackendConfig,
}

impl SourceConfig {
    /// Load from `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `DATABASE_URL`.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(REST_URL_VAR).ok(),
            std::env::var(REST_KEY_VAR).ok(),
            std::env::var(DATABASE_URL_VAR).ok(),
        )
    }

    /// Build from explicit values.
    ///
    /// REST wins when its URL and key are both usable; otherwise a non-empty
    /// database URL selects Postgres; otherwise the backend is unconfigured.
    pub fn from_vars(
        rest_url: Option<String>,
        rest_key: Option<String>,
        database_url: Option<String>,
    ) -> Self {
        let rest_url = rest_url.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let rest_key = rest_key.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let database_url = database_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let backend = match (rest_url, rest_key) {
            (Some(url), Some(api_key)) if is_usable_rest_url(&url) => {
                BackendConfig::Rest { url, api_key }
            }
            (url, key) => {
                if url.is_some() || key.is_some() {
                    tracing::warn!(
                        "{REST_URL_VAR}/{REST_KEY_VAR} are incomplete or hold a placeholder; REST backend disabled"
                    );
                }
                match database_url {
                    Some(url) => BackendConfig::Postgres { url },
                    None => {
                        tracing::warn!("no availability backend configured; stock will read as empty");
                        BackendConfig::Unconfigured
                    }
                }
            }
        };

        Self { backend }
    }

    pub fn unconfigured() -> Self {
        Self {
            backend: BackendConfig::Unconfigured,
        }
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self.backend, BackendConfig::Unconfigured)
    }
}

fn is_usable_rest_url(url: &str) -> bool {
    url.starts_with("https://") && !url.contains(REST_URL_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn https_url_and_key_select_rest() {
        let cfg = SourceConfig::from_vars(some("https://abc.supabase.co"), some("anon"), None);
        assert_eq!(
            cfg.backend(),
            &BackendConfig::Rest {
                url: "https://abc.supabase.co".to_string(),
                api_key: "anon".to_string(),
            }
        );
        assert!(cfg.is_configured());
    }

    #[test]
    fn placeholder_and_plain_http_are_rejected() {
        let placeholder =
            SourceConfig::from_vars(some("https://your-supabase-url.supabase.co"), some("k"), None);
        assert_eq!(placeholder.backend(), &BackendConfig::Unconfigured);

        let http = SourceConfig::from_vars(some("http://localhost:54321"), some("k"), None);
        assert!(!http.is_configured());
    }

    #[test]
    fn missing_key_disables_rest() {
        let cfg = SourceConfig::from_vars(some("https://abc.supabase.co"), some("  "), None);
        assert_eq!(cfg.backend(), &BackendConfig::Unconfigured);
    }

    #[test]
    fn database_url_is_the_fallback() {
        let cfg = SourceConfig::from_vars(None, None, some("postgres://localhost/store"));
        assert_eq!(
            cfg.backend(),
            &BackendConfig::Postgres {
                url: "postgres://localhost/store".to_string(),
            }
        );

        let rest_first = SourceConfig::from_vars(
            some("https://abc.supabase.co"),
            some("anon"),
            some("postgres://localhost/store"),
        );
        assert!(matches!(rest_first.backend(), BackendConfig::Rest { .. }));
    }

    #[test]
    fn nothing_set_is_unconfigured() {
        let cfg = SourceConfig::from_vars(None, None, None);
        assert_eq!(cfg, SourceConfig::unconfigured());
        assert!(!cfg.is_configured());
    }
}
