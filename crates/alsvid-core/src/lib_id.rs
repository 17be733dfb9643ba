//! Library identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable key naming a supported circuit or device ecosystem.
///
/// The built-in ids are [`LibId::alsvid`] (native DAG IR),
/// [`LibId::hiq`] (command-list model), [`LibId::qasm3`] (OpenQASM 3
/// text), and [`LibId::qdmi`] (abstract device descriptions). Callers
/// may mint their own ids for registered extensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibId(String);

impl LibId {
    /// Create a library id from an arbitrary string key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The native DAG circuit ecosystem.
    pub fn alsvid() -> Self {
        Self::new("alsvid")
    }

    /// The HIQ command-list circuit ecosystem.
    pub fn hiq() -> Self {
        Self::new("hiq")
    }

    /// OpenQASM 3 source text.
    pub fn qasm3() -> Self {
        Self::new("qasm3")
    }

    /// Abstract QDMI-style device descriptions.
    pub fn qdmi() -> Self {
        Self::new("qdmi")
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LibId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
