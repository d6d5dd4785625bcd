use crate::error::{CatalogError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LOCAL_URL: &str = "http://localhost:3000/products";

pub const BACKEND_ENV: &str = "CATALOG_BACKEND";
pub const URL_ENV: &str = "CATALOG_URL";
pub const API_KEY_ENV: &str = "CATALOG_API_KEY";
pub const STATE_DIR_ENV: &str = "CATALOG_STATE_DIR";
pub const LOG_ENV: &str = "CATALOG_LOG";

/// File holding the persisted client-side preferences.
pub const PREFS_FILE: &str = "prefs.json";

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Currency suffix appended to rendered prices.
pub const CURRENCY_SUFFIX: &str = "€";

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// The remote API flavour the client talks to.
///
/// Each flavour fixes the URL layout, the "list all" envelope, the
/// credential header and which mutations are available. Pick one per
/// deployment; they are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// A local REST server: bare arrays, id in the item path, no auth.
    #[default]
    LocalRest,
    /// A JSON document store: `{record: {products: [...]}}` envelope,
    /// partial updates sent to the collection with the id in the body.
    DocumentStore,
    /// A hosted REST backend with full replace and delete.
    HostedRest,
}

impl Backend {
    pub fn supports_edit(self) -> bool {
        matches!(self, Backend::HostedRest)
    }

    pub fn supports_delete(self) -> bool {
        matches!(self, Backend::HostedRest)
    }

    /// Whether failures and successes are surfaced as on-screen notifications.
    pub fn notifies(self) -> bool {
        matches!(self, Backend::HostedRest)
    }

    /// Partial updates go to the collection endpoint with the id in the body.
    pub fn stock_patch_in_body(self) -> bool {
        matches!(self, Backend::DocumentStore)
    }

    /// Header name and value for the configured credential, if any.
    pub fn credential_header(self, key: &str) -> Option<(&'static str, String)> {
        match self {
            Backend::LocalRest => None,
            Backend::DocumentStore => Some(("X-Master-Key", key.to_string())),
            Backend::HostedRest => Some(("Authorization", format!("Bearer {key}"))),
        }
    }
}

impl FromStr for Backend {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "local-rest" | "rest" => Ok(Backend::LocalRest),
            "document" | "document-store" => Ok(Backend::DocumentStore),
            "hosted" | "hosted-rest" => Ok(Backend::HostedRest),
            other => Err(CatalogError::InvalidInput(format!(
                "unknown backend '{other}' (expected local, document or hosted)"
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::LocalRest => "local",
            Backend::DocumentStore => "document",
            Backend::HostedRest => "hosted",
        })
    }
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Deployment settings, usually read from the environment.
///
/// The credential is injected here at deploy time and never compiled in.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub backend: Backend,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub state_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match non_empty(BACKEND_ENV) {
            Some(raw) => raw.parse()?,
            None => Backend::default(),
        };

        Ok(Self {
            backend,
            base_url: non_empty(URL_ENV),
            api_key: non_empty(API_KEY_ENV),
            state_dir: non_empty(STATE_DIR_ENV).map(PathBuf::from),
        })
    }

    /// The collection endpoint, falling back to the local server default.
    ///
    /// Only the local flavour has a usable default; the other two need an
    /// explicit URL.
    pub fn collection_url(&self) -> Result<String> {
        match (&self.base_url, self.backend) {
            (Some(url), _) => Ok(url.trim_end_matches('/').to_string()),
            (None, Backend::LocalRest) => Ok(DEFAULT_LOCAL_URL.to_string()),
            (None, backend) => Err(CatalogError::InvalidInput(format!(
                "backend '{backend}' requires {URL_ENV} to be set"
            ))),
        }
    }
}

pub fn default_state_dir() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        config.join("catalog-client")
    } else {
        PathBuf::from(".catalog-client")
    }
}

/// Today's date as the `YYYY-MM-DD` string stamped on every mutation.
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
