//! Service configuration from environment variables

use std::path::PathBuf;

use anyhow::Result;

/// API service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Path to the prompt template TOML file
    pub templates_path: PathBuf,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: listen address (default: "0.0.0.0:8000")
    /// - `TEMPLATES_PATH`: prompt template file (default: "templates.toml",
    ///   resolved against the working directory, then the crate root)
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let templates_path =
            std::env::var("TEMPLATES_PATH").unwrap_or_else(|_| "templates.toml".to_string());
        let templates_path = resolve_path(&templates_path);

        Ok(Self {
            bind_addr,
            templates_path,
        })
    }
}

/// Resolve a configured path against the working directory, falling back
/// to the crate root for paths that only exist next to the sources
fn resolve_path(raw: &str) -> PathBuf {
    let direct = PathBuf::from(raw);
    if direct.exists() {
        return direct;
    }

    let mut from_manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    from_manifest.push(raw);
    if from_manifest.exists() {
        return from_manifest;
    }

    direct
}
