//! Transpiler contract, options, result types, and registry.

pub mod alsvid;
pub mod hiq;
pub mod layout;
pub mod qasm3;
pub mod stats;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::device::Device;
use crate::error::AlsvidError;
use crate::lib_id::LibId;
use crate::program::Program;

pub use alsvid::AlsvidTranspiler;
pub use hiq::HiqTranspiler;
pub use qasm3::Qasm3Transpiler;

/// Options accepted by every transpiler.
///
/// A string-keyed mapping; the one recognized key is
/// `optimization_level` (integer, 0 through 3, default 1).
/// Unrecognized keys are ignored for forward compatibility.
#[derive(Debug, Clone, Default)]
pub struct TranspilerOptions(serde_json::Map<String, Value>);

impl TranspilerOptions {
    /// Empty options (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Convenience constructor for the one recognized key.
    pub fn optimization(level: impl Into<Value>) -> Self {
        Self::new().with("optimization_level", level)
    }

    /// Read a raw option value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The validated optimization level.
    ///
    /// Fails fast on anything but an integer in `0..=3`; validation
    /// happens before any circuit is touched.
    pub fn optimization_level(&self) -> Result<u8, AlsvidError> {
        match self.0.get("optimization_level") {
            None => Ok(1),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(level @ 0..=3) => Ok(u8::try_from(level).expect("level fits in u8")),
                _ => Err(AlsvidError::InvalidOptimizationLevel {
                    value: n.to_string(),
                }),
            },
            Some(other) => Err(AlsvidError::InvalidOptimizationLevel {
                value: other.to_string(),
            }),
        }
    }
}

impl From<serde_json::Map<String, Value>> for TranspilerOptions {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Per-circuit statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitStats {
    /// Declared qubits.
    pub n_qubits: usize,
    /// Instructions outside the non-unitary set.
    pub n_gates: usize,
    /// Gates on exactly one qubit.
    pub n_gates_1q: usize,
    /// Gates on exactly two qubits.
    pub n_gates_2q: usize,
    /// Native depth metric of the circuit.
    pub depth: usize,
}

/// Before/after statistics of one transpilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspileStats {
    /// Statistics of the input circuit.
    pub before: CircuitStats,
    /// Statistics of the transpiled circuit.
    pub after: CircuitStats,
}

/// Virtual-to-physical index mappings.
///
/// Every virtual index of the input circuit appears as a key; when no
/// placement ran the mapping is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualPhysicalMapping {
    /// Virtual qubit index -> physical qubit index.
    pub qubit_mapping: FxHashMap<usize, usize>,
    /// Virtual bit index -> physical bit index.
    pub bit_mapping: FxHashMap<usize, usize>,
}

impl VirtualPhysicalMapping {
    /// Identity mapping over the given qubit and bit counts.
    pub fn identity(n_qubits: usize, n_bits: usize) -> Self {
        Self {
            qubit_mapping: (0..n_qubits).map(|i| (i, i)).collect(),
            bit_mapping: (0..n_bits).map(|i| (i, i)).collect(),
        }
    }
}

/// The uniform transpilation result.
#[derive(Debug, Clone)]
pub struct TranspileResult {
    /// The transpiled program; the orchestrator converts it back to
    /// the caller's original representation.
    pub transpiled_program: Program,
    /// Before/after statistics.
    pub stats: TranspileStats,
    /// Virtual-to-physical mappings.
    pub virtual_physical_mapping: VirtualPhysicalMapping,
}

/// A backend transpiler.
///
/// Stateful only in being bound to the library whose programs it
/// consumes natively. Each `transpile` call is independent and leaves
/// the input untouched.
pub trait Transpiler: Send + Sync {
    /// The library id of this transpiler's native program
    /// representation; the orchestrator converts inputs to it.
    fn program_lib(&self) -> &LibId;

    /// Transpile a program, optionally against a device.
    fn transpile(
        &self,
        program: &Program,
        options: &TranspilerOptions,
        device: Option<&Device>,
    ) -> Result<TranspileResult, AlsvidError>;
}

/// Registry of transpilers plus the per-device-library defaults.
#[derive(Default)]
pub struct TranspilerRegistry {
    transpilers: FxHashMap<LibId, Box<dyn Transpiler>>,
    default_libs: FxHashMap<LibId, LibId>,
}

impl TranspilerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transpiler under a library id.
    pub fn register_transpiler(
        &mut self,
        lib: LibId,
        transpiler: Box<dyn Transpiler>,
    ) -> Result<(), AlsvidError> {
        if self.transpilers.contains_key(&lib) {
            return Err(AlsvidError::TranspilerAlreadyRegistered(lib));
        }
        debug!("Registering transpiler for library '{}'", lib);
        self.transpilers.insert(lib, transpiler);
        Ok(())
    }

    /// Look up a transpiler by library id.
    pub fn get_transpiler(&self, lib: &LibId) -> Result<&dyn Transpiler, AlsvidError> {
        self.transpilers
            .get(lib)
            .map(AsRef::as_ref)
            .ok_or_else(|| AlsvidError::TranspilerNotFound(lib.clone()))
    }

    /// Register the default transpiler library for a device library.
    pub fn register_default_transpiler_lib(
        &mut self,
        device_lib: LibId,
        transpiler_lib: LibId,
    ) -> Result<(), AlsvidError> {
        if self.default_libs.contains_key(&device_lib) {
            return Err(AlsvidError::DefaultTranspilerLibAlreadyRegistered(device_lib));
        }
        self.default_libs.insert(device_lib, transpiler_lib);
        Ok(())
    }

    /// The default transpiler library for a device library, if any.
    pub fn get_default_transpiler_lib(&self, device_lib: &LibId) -> Option<&LibId> {
        self.default_libs.get(device_lib)
    }
}
