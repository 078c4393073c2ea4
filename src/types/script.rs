use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

use crate::error::SchemaPushError;

/// Opaque SQL text sent as-is to the query endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaScript {
    sql: Arc<str>,
}

impl SchemaScript {
    /// Whitespace-only text counts as empty.
    pub fn new(sql: impl Into<Arc<str>>) -> Result<Self, SchemaPushError> {
        let sql = sql.into();
        if sql.trim().is_empty() {
            return Err(SchemaPushError::EmptyScript);
        }
        Ok(Self { sql })
    }

    /// Load from a file; `-` reads standard input.
    pub fn load(path: &Path) -> Result<Self, SchemaPushError> {
        if path == Path::new("-") {
            return Self::from_reader(io::stdin().lock(), path);
        }
        let sql = fs::read_to_string(path).map_err(|source| SchemaPushError::ReadScript {
            path: PathBuf::from(path),
            source,
        })?;
        Self::new(sql)
    }

    /// Read the whole script from `reader`; `origin` names it in errors.
    pub fn from_reader(mut reader: impl Read, origin: &Path) -> Result<Self, SchemaPushError> {
        let mut sql = String::new();
        reader
            .read_to_string(&mut sql)
            .map_err(|source| SchemaPushError::ReadScript {
                path: PathBuf::from(origin),
                source,
            })?;
        Self::new(sql)
    }

    pub fn as_str(&self) -> &str {
        &self.sql
    }

    pub fn len(&self) -> usize {
        self.sql.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}
