//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit} not found in circuit (op: {op})")]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Operation name for context.
        op: String,
    },

    /// Classical bit not found in circuit.
    #[error("Classical bit {clbit} not found in circuit (op: {op})")]
    ClbitNotFound {
        /// The classical bit that was not found.
        clbit: ClbitId,
        /// Operation name for context.
        op: String,
    },

    /// Gate applied to the wrong number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation (op: {op})")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Operation name for context.
        op: String,
    },

    /// Invalid DAG structure.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
