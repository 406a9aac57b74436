//! Replacement rules: regex patterns over repository ids mapped to tokens.
//!
//! Rules keep the order in which they appear in the configuration file and
//! the first matching rule wins. An id matching several rules is reported
//! with a warning but otherwise resolved the same way.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ConfigError;

/// A compiled pattern and the token it assigns.
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    pub pattern: Regex,
    pub token: String,
}

/// Ordered set of replacement rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ReplacementRule>,
}

impl RuleSet {
    /// Compiles every `(pattern, token)` pair, keeping their order.
    ///
    /// # Errors
    ///
    /// Fails on the first pattern that is not a valid regex.
    pub fn compile<I, P, T>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: Into<String>,
    {
        let mut rules = Vec::new();
        for (pattern, token) in pairs {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source: e,
            })?;
            rules.push(ReplacementRule {
                pattern: regex,
                token: token.into(),
            });
        }
        Ok(RuleSet { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReplacementRule> {
        self.rules.iter()
    }

    /// Token of the first rule whose pattern matches anywhere in `id`.
    ///
    /// Matching is unanchored and case-sensitive; use `^`/`$` in the pattern
    /// to anchor.
    pub fn match_token(&self, id: &str) -> Option<&str> {
        let matching = self.matching_patterns(id);
        if matching.len() > 1 {
            warn!(
                id,
                patterns = ?matching,
                "repository matches several rules; using the first"
            );
        }
        self.rules
            .iter()
            .find(|r| r.pattern.is_match(id))
            .map(|r| r.token.as_str())
    }

    /// All patterns matching `id`, in rule order.
    pub fn matching_patterns(&self, id: &str) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.pattern.is_match(id))
            .map(|r| r.pattern.as_str())
            .collect()
    }
}

/// Contents of the JSON configuration file.
#[derive(Debug, Default)]
pub struct Config {
    /// Root of the repositories tree, if the file names one.
    pub repositories_dir: Option<PathBuf>,
    pub rules: RuleSet,
}

/// The `{ "gitea_repositories_dir": ..., "rules": {...} }` shape.
#[derive(Debug, Deserialize)]
struct StructuredConfig {
    gitea_repositories_dir: Option<PathBuf>,
    #[serde(default)]
    rules: Map<String, Value>,
}

impl Config {
    /// Reads and compiles the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Json { source, .. } => ConfigError::Json {
                path: path.to_path_buf(),
                source,
            },
            ConfigError::NotAnObject(_) => ConfigError::NotAnObject(path.to_path_buf()),
            other => other,
        })
    }

    /// Parses configuration text.
    ///
    /// Two shapes are accepted: an object with `gitea_repositories_dir`
    /// and/or `rules`, or a flat object mapping patterns to tokens.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let json_err = |e: serde_json::Error| ConfigError::Json {
            path: PathBuf::new(),
            source: e,
        };
        let value: Value = serde_json::from_str(text).map_err(json_err)?;
        let Value::Object(object) = value else {
            return Err(ConfigError::NotAnObject(PathBuf::new()));
        };

        let (repositories_dir, rules) =
            if object.contains_key("rules") || object.contains_key("gitea_repositories_dir") {
                let structured: StructuredConfig =
                    serde_json::from_value(Value::Object(object)).map_err(json_err)?;
                (structured.gitea_repositories_dir, structured.rules)
            } else {
                (None, object)
            };

        let mut pairs = Vec::with_capacity(rules.len());
        for (pattern, token) in rules {
            match token {
                Value::String(t) => pairs.push((pattern, t)),
                _ => return Err(ConfigError::TokenNotString(pattern)),
            }
        }

        Ok(Config {
            repositories_dir,
            rules: RuleSet::compile(pairs)?,
        })
    }
}
