//! Error types for QASM parsing and emission.

use alsvid_ir::IrError;
use thiserror::Error;

/// Errors produced while parsing QASM source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Unrecognized characters in the source.
    #[error("Unrecognized token at byte {offset}")]
    Lex {
        /// Byte offset of the bad input.
        offset: usize,
    },

    /// The parser expected something else here.
    #[error("Expected {expected} but found {found} at byte {offset}")]
    Unexpected {
        /// What the grammar required.
        expected: String,
        /// What was found instead.
        found: String,
        /// Byte offset of the token.
        offset: usize,
    },

    /// Source ended mid-statement.
    #[error("Unexpected end of input; expected {expected}")]
    UnexpectedEof {
        /// What the grammar required.
        expected: String,
    },

    /// A gate name with no known semantics.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// A register that was never declared.
    #[error("Unknown register '{0}'")]
    UnknownRegister(String),

    /// An index outside the declared register size.
    #[error("Index {index} out of range for register '{register}' of size {size}")]
    IndexOutOfRange {
        /// Register name.
        register: String,
        /// Offending index.
        index: u64,
        /// Declared size.
        size: u32,
    },

    /// A gate called with the wrong number of parameters.
    #[error("Gate '{gate}' expects {expected} parameter(s), got {got}")]
    WrongParamCount {
        /// Gate name.
        gate: String,
        /// Required parameter count.
        expected: usize,
        /// Provided parameter count.
        got: usize,
    },

    /// A gate applied to the wrong number of operands.
    #[error("Gate '{gate}' expects {expected} qubit operands, got {got}")]
    WrongArity {
        /// Gate name.
        gate: String,
        /// Required operand count.
        expected: u32,
        /// Provided operand count.
        got: usize,
    },

    /// Whole-register operands must agree in size.
    #[error("Register operands of '{gate}' have mismatched sizes")]
    BroadcastMismatch {
        /// Gate name.
        gate: String,
    },

    /// Underlying IR error while building the circuit.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors produced while emitting QASM source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// The circuit contains an operation the format cannot express.
    #[error("Operation '{0}' cannot be expressed in QASM output")]
    Unsupported(String),
}
