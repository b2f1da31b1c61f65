//! Curated answer tables, scoped by role.
//!
//! Keys are normalized once at construction; lookups normalize the incoming
//! message the same way and then require an exact full-string match.

use crate::models::Role;
use crate::services::catalog;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswerTableError {
    #[error("Failed to read answer file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse answer file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown role '{0}' in answer file")]
    UnknownRole(String),
}

/// Lowercase the whole message and trim surrounding whitespace.
pub fn normalize(message: &str) -> String {
    message.trim().to_lowercase()
}

/// Immutable mapping from role to normalized question to answer.
#[derive(Debug, Clone, Default)]
pub struct AnswerTable {
    tables: HashMap<Role, HashMap<String, String>>,
}

impl AnswerTable {
    pub fn builder() -> AnswerTableBuilder {
        AnswerTableBuilder::default()
    }

    /// Table with the built-in portal catalogue.
    pub fn builtin() -> Self {
        let mut builder = Self::builder();
        for (role, entries) in catalog::builtin_entries() {
            for &(question, answer) in entries {
                builder = builder.entry(role, question, answer);
            }
        }
        builder.build()
    }

    /// Load a table from JSON shaped as `{ "<role>": { "<question>": "<answer>" } }`.
    ///
    /// Role names are the audience roles plus `default`.
    pub fn from_json_str(json: &str, source: &str) -> Result<Self, AnswerTableError> {
        let raw: BTreeMap<String, BTreeMap<String, String>> =
            serde_json::from_str(json).map_err(|e| AnswerTableError::Parse {
                path: source.to_string(),
                source: e,
            })?;

        let mut builder = Self::builder();
        for (role_name, entries) in raw {
            let role = parse_table_role(&role_name)?;
            for (question, answer) in entries {
                builder = builder.entry(role, &question, answer);
            }
        }
        Ok(builder.build())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AnswerTableError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|e| AnswerTableError::Read {
            path: display.clone(),
            source: e,
        })?;
        Self::from_json_str(&json, &display)
    }

    /// Exact lookup of a message within one role's table.
    pub fn lookup(&self, role: Role, message: &str) -> Option<&str> {
        self.tables
            .get(&role)
            .and_then(|table| table.get(&normalize(message)))
            .map(String::as_str)
    }

    /// Normalized questions curated for a role, sorted.
    pub fn questions(&self, role: Role) -> Vec<String> {
        let mut questions: Vec<String> = self
            .tables
            .get(&role)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default();
        questions.sort();
        questions
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_table_role(name: &str) -> Result<Role, AnswerTableError> {
    if name.trim().eq_ignore_ascii_case(Role::Default.as_str()) {
        return Ok(Role::Default);
    }
    name.parse::<Role>()
        .map_err(|_| AnswerTableError::UnknownRole(name.to_string()))
}

#[derive(Debug, Default)]
pub struct AnswerTableBuilder {
    tables: HashMap<Role, HashMap<String, String>>,
}

impl AnswerTableBuilder {
    /// Add an entry; the question is normalized, the answer kept verbatim.
    pub fn entry(mut self, role: Role, question: &str, answer: impl Into<String>) -> Self {
        self.tables
            .entry(role)
            .or_default()
            .insert(normalize(question), answer.into());
        self
    }

    pub fn build(self) -> AnswerTable {
        AnswerTable {
            tables: self.tables,
        }
    }
}
