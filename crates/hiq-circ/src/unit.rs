//! Register-named unit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a qubit or classical bit: a register name plus a
/// short index sequence.
///
/// Most units have a single-element index (`q[3]`), but the model
/// allows multi-dimensional registers, so consumers must not assume a
/// plain integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId {
    /// Register name.
    pub register: String,
    /// Index within the register; may be empty for scalar registers.
    pub index: Vec<u32>,
}

impl UnitId {
    /// Create a unit id.
    pub fn new(register: impl Into<String>, index: Vec<u32>) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }

    /// Default qubit register unit: `q[i]`.
    pub fn qubit(i: u32) -> Self {
        Self::new("q", vec![i])
    }

    /// Default bit register unit: `c[i]`.
    pub fn bit(i: u32) -> Self {
        Self::new("c", vec![i])
    }

    /// Physical node unit used by routed circuits: `node[i]`.
    pub fn node(i: u32) -> Self {
        Self::new("node", vec![i])
    }

    /// The leading index element, when present.
    pub fn first_index(&self) -> Option<u32> {
        self.index.first().copied()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.register)?;
        for i in &self.index {
            write!(f, "[{i}]")?;
        }
        Ok(())
    }
}
