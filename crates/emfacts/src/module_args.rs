//! Module argument files handed over by the automation engine.
//!
//! Two encodings arrive in practice: a JSON object (either flat or nested
//! under `ANSIBLE_MODULE_ARGS`) and the older `key=value` form with
//! optional shell-style quoting.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::CliError;

const NESTED_KEY: &str = "ANSIBLE_MODULE_ARGS";

/// Inputs of one module invocation. Missing entries fall back to flags
/// and the active profile.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModuleArgs {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
struct RawArgs {
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    #[serde(default)]
    debug: Option<Value>,
}

impl ModuleArgs {
    /// Read and parse an arguments file.
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse either encoding. Unknown keys are ignored.
    pub fn parse(text: &str) -> Result<Self, CliError> {
        let text = text.trim();
        if text.starts_with('{') {
            Self::parse_json(text)
        } else {
            Self::parse_pairs(text)
        }
    }

    fn parse_json(text: &str) -> Result<Self, CliError> {
        let mut value: Value = serde_json::from_str(text)?;
        if let Some(nested) = value.get_mut(NESTED_KEY) {
            value = nested.take();
        }
        let raw: RawArgs = serde_json::from_value(value)?;

        Ok(Self {
            host: raw.host,
            username: raw.username,
            password: raw.password,
            debug: raw.debug.as_ref().is_some_and(json_truthy),
        })
    }

    fn parse_pairs(text: &str) -> Result<Self, CliError> {
        let mut args = Self::default();
        for token in split_words(text)? {
            let Some((key, value)) = token.split_once('=') else {
                return Err(CliError::Validation {
                    field: "module arguments".into(),
                    reason: format!("expected key=value, got '{token}'"),
                });
            };
            match key {
                "host" => args.host = Some(value.to_owned()),
                "username" => args.username = Some(value.to_owned()),
                "password" => args.password = Some(value.to_owned()),
                "debug" => args.debug = truthy(value),
                other => tracing::debug!(key = other, "ignoring unknown module argument"),
            }
        }
        Ok(args)
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}

fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => truthy(s),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Whitespace split honouring single and double quotes.
fn split_words(text: &str) -> Result<Vec<String>, CliError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in text.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '\'' || ch == '"' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CliError::Validation {
            field: "module arguments".into(),
            reason: "unterminated quote".into(),
        });
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
