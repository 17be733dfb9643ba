//! Compilation target description.

use serde::{Deserialize, Serialize};

use crate::property::{CouplingMap, GateSet};

/// A plain description of a compilation target device.
///
/// Only the read accessors consumed by compilation are modeled: name,
/// version, qubit count, native gate set, and coupling. There is no
/// execution surface here; submitting circuits is out of scope for
/// this crate.
///
/// A target with a qubit count but no coupling map is treated as fully
/// connected. A target referenced for rebasing must declare a gate
/// set; callers fail rather than guess one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    name: String,
    version: Option<String>,
    num_qubits: u32,
    gate_set: Option<GateSet>,
    coupling: Option<CouplingMap>,
}

impl Target {
    /// Create a new target with a name and qubit count.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            version: None,
            num_qubits,
            gate_set: None,
            coupling: None,
        }
    }

    /// Set the device version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the native gate set.
    #[must_use]
    pub fn with_gate_set(mut self, gate_set: GateSet) -> Self {
        self.gate_set = Some(gate_set);
        self
    }

    /// Set the coupling map.
    #[must_use]
    pub fn with_coupling(mut self, coupling: CouplingMap) -> Self {
        self.coupling = Some(coupling);
        self
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the device version, if declared.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the native gate set, if declared.
    pub fn gate_set(&self) -> Option<&GateSet> {
        self.gate_set.as_ref()
    }

    /// Get the coupling map, if declared.
    pub fn coupling(&self) -> Option<&CouplingMap> {
        self.coupling.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_builder() {
        let target = Target::new("five-line", 5)
            .with_version("1.2.0")
            .with_gate_set(GateSet::standard())
            .with_coupling(CouplingMap::linear(5));

        assert_eq!(target.name(), "five-line");
        assert_eq!(target.version(), Some("1.2.0"));
        assert_eq!(target.num_qubits(), 5);
        assert!(target.gate_set().is_some());
        assert!(target.coupling().is_some());
    }

    #[test]
    fn test_target_without_coupling() {
        let target = Target::new("all-to-all", 8).with_gate_set(GateSet::extended());
        assert!(target.coupling().is_none());
        assert_eq!(target.num_qubits(), 8);
    }
}
