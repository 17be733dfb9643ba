//! Error types for the compile crate.

use alsvid_ir::IrError;
use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A routing pass ran without a coupling map.
    #[error("No coupling map available for routing")]
    MissingCouplingMap,

    /// A pass that needs a layout ran before one was computed.
    #[error("No qubit layout available")]
    MissingLayout,

    /// The circuit does not fit on the target device.
    #[error("Circuit requires {required} qubits but device has {available}")]
    CircuitTooLarge {
        /// Qubits required by the circuit.
        required: usize,
        /// Qubits available on the device.
        available: u32,
    },

    /// No routing path exists between two physical qubits.
    #[error("No routing path between physical qubits {qubit1} and {qubit2}")]
    RoutingFailed {
        /// First physical qubit.
        qubit1: u32,
        /// Second physical qubit.
        qubit2: u32,
    },

    /// A gate cannot be expressed in the target gate set.
    #[error("Gate '{gate}' cannot be rebased into the target gate set")]
    UnsupportedGate {
        /// Name of the offending gate.
        gate: String,
    },

    /// Underlying IR error.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
