//! Error types for the HIQ circuit model.

use thiserror::Error;

use crate::unit::UnitId;

/// Errors from circuit construction and passes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CircError {
    /// A command referenced a unit the circuit does not declare.
    #[error("Unit {0} not found in circuit")]
    UnknownUnit(UnitId),

    /// A command carried the wrong number of arguments.
    #[error("Op '{op}' expects {expected} arguments, got {got}")]
    ArityMismatch {
        /// Op name.
        op: String,
        /// Required argument count.
        expected: usize,
        /// Provided argument count.
        got: usize,
    },

    /// A command listed the same unit twice.
    #[error("Duplicate argument {0} in command")]
    DuplicateArg(UnitId),

    /// No routing path between two architecture nodes.
    #[error("No path between nodes {0} and {1} in the architecture")]
    NoPath(u32, u32),

    /// The circuit does not fit the architecture.
    #[error("Circuit uses {required} qubits but the architecture has {available} nodes")]
    TooManyQubits {
        /// Qubits in the circuit.
        required: usize,
        /// Nodes on the device.
        available: u32,
    },

    /// A gate cannot be expressed in the requested gate set.
    #[error("Op '{0}' cannot be rebased into the requested gate set")]
    UnsupportedOp(String),
}

/// Result type for circuit operations.
pub type CircResult<T> = Result<T, CircError>;

/// Errors from conversions between circuit models.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InteropError {
    /// The source circuit contains a construct the target model cannot
    /// express.
    #[error("Operation '{0}' has no equivalent in the target representation")]
    UnsupportedOperation(String),

    /// Rebuilding the target circuit failed.
    #[error("Failed to rebuild target circuit: {0}")]
    Rebuild(String),
}
