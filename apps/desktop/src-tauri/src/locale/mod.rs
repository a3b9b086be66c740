//! Translation resources on disk.
//!
//! Each language is a flat JSON map at `<root>/<code>.json`.

use matchquiz_core::{is_valid_code, LocaleError, Translations};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Environment override for the translations directory.
pub const LOCALES_DIR_ENV: &str = "MATCHQUIZ_LOCALES_DIR";

#[derive(Debug, Clone)]
pub struct LocaleDirectory {
    root: PathBuf,
}

impl LocaleDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `MATCHQUIZ_LOCALES_DIR` if set, otherwise `locales/` under `resource_dir`.
    pub fn resolve(resource_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = std::env::var_os(LOCALES_DIR_ENV) {
            return Self::new(dir);
        }
        let base = resource_dir.unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("locales"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read and parse the translations for `code`.
    pub async fn fetch(&self, code: &str) -> Result<Translations, LocaleError> {
        if !is_valid_code(code) {
            return Err(LocaleError::InvalidCode {
                code: code.to_string(),
            });
        }

        let path = self.root.join(format!("{code}.json"));
        tracing::debug!(path = %path.display(), "reading translations");

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => LocaleError::NotFound {
                    code: code.to_string(),
                },
                _ => LocaleError::Io {
                    code: code.to_string(),
                    reason: e.to_string(),
                },
            })?;

        Translations::from_json_str(code, &content)
    }
}
