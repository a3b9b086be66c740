//! UI text lookup for the active language.
//!
//! Translation maps are flat `{ "key": "text" }` objects fetched by the
//! host. A failed fetch installs the built-in Portuguese map, so lookups
//! always have something to show.

use crate::error::LocaleError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Language of the built-in map.
pub const BUILTIN_LANGUAGE: &str = "pt";

/// Keys of the static UI chrome. Every one is present in the built-in map.
pub const CHROME_KEYS: &[&str] = &[
    "correct",
    "wrong",
    "load_file",
    "restart",
    "show_errors",
    "error_log_title",
    "no_errors",
    "col_index",
    "col_subtopic",
    "col_dropped_into",
    "col_correct_topic",
    "col_time",
    "page_of",
    "previous",
    "next",
    "close",
    "language",
    "invalid_file",
    "no_description",
    "help_title",
    "help_body",
];

const BUILTIN: &[(&str, &str)] = &[
    ("correct", "Corretas"),
    ("wrong", "Erradas"),
    ("load_file", "Carregar arquivo"),
    ("restart", "Reiniciar"),
    ("show_errors", "Ver erros"),
    ("error_log_title", "Histórico de Erros"),
    ("no_errors", "Nenhum erro registrado ainda."),
    ("col_index", "#"),
    ("col_subtopic", "Item"),
    ("col_dropped_into", "Colocado em"),
    ("col_correct_topic", "Categoria correta"),
    ("col_time", "Hora"),
    ("page_of", "Página {page} de {total}"),
    ("previous", "Anterior"),
    ("next", "Próxima"),
    ("close", "Fechar"),
    ("language", "Idioma"),
    ("invalid_file", "Arquivo JSON inválido"),
    ("no_description", "Nenhuma descrição disponível."),
    ("help_title", "Como jogar"),
    (
        "help_body",
        "Carregue um arquivo de taxonomia e arraste cada item para a categoria correta.",
    ),
];

/// A flat key → text map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(HashMap<String, String>);

impl Translations {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    /// The fallback map shipped with the library.
    pub fn builtin() -> Self {
        Self(
            BUILTIN
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Parse a translation resource for `code`.
    pub fn from_json_str(code: &str, content: &str) -> Result<Self, LocaleError> {
        serde_json::from_str(content).map_err(|e| LocaleError::Malformed {
            code: code.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where the active map came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleOrigin {
    Fetched,
    Fallback,
}

/// Ticket for an in-flight language switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleRequest {
    pub code: String,
    generation: u64,
}

/// Accepts `[A-Za-z0-9_-]+`, which is all a language tag needs and keeps
/// codes safe to use as file names.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Clone)]
pub struct Localizer {
    code: String,
    translations: Translations,
    generation: u64,
}

impl Localizer {
    /// Start in `code` with the built-in map until a fetch completes.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            translations: Translations::builtin(),
            generation: 0,
        }
    }

    pub fn language(&self) -> &str {
        &self.code
    }

    /// Text for `key`, or the key itself when there is none.
    pub fn translate(&self, key: &str) -> String {
        match self.translations.get(key) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => key.to_string(),
        }
    }

    /// Translate and substitute `{name}` placeholders.
    pub fn translate_with(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut text = self.translate(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    /// Begin switching to `code`. Any switch begun earlier becomes stale.
    pub fn begin_switch(&mut self, code: impl Into<String>) -> LocaleRequest {
        self.generation += 1;
        LocaleRequest {
            code: code.into(),
            generation: self.generation,
        }
    }

    /// Install the result of a fetch. Returns `None` if a newer switch has
    /// started since `request` was issued.
    pub fn complete_switch(
        &mut self,
        request: LocaleRequest,
        fetched: Result<Translations, LocaleError>,
    ) -> Option<LocaleOrigin> {
        if request.generation != self.generation {
            tracing::debug!(code = %request.code, "discarding stale translation fetch");
            return None;
        }

        let (translations, origin) = match fetched {
            Ok(map) => (map, LocaleOrigin::Fetched),
            Err(e) => {
                tracing::warn!(code = %request.code, error = %e, "using built-in translations");
                (Translations::builtin(), LocaleOrigin::Fallback)
            }
        };

        tracing::info!(code = %request.code, ?origin, "language switched");
        self.code = request.code;
        self.translations = translations;
        Some(origin)
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(BUILTIN_LANGUAGE)
    }
}
