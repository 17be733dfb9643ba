//! `OpenQASM` 3 parser and emitter for Alsvid.
//!
//! Reads and writes the `OpenQASM` 3.0 subset the orchestration layer
//! exchanges: version declaration, includes, qubit/bit declarations
//! (plus the legacy `qreg`/`creg` forms), standard and parameterized
//! gates, measurements in both `c = measure q` and `measure q -> c`
//! syntax, barriers, resets, and comments.
//!
//! # Example: round trip
//!
//! ```rust
//! use alsvid_qasm3::{emit, parse};
//!
//! let source = r#"
//!     OPENQASM 3.0;
//!     include "stdgates.inc";
//!     qubit[2] q;
//!     bit[2] c;
//!     h q[0];
//!     cx q[0], q[1];
//!     c[0] = measure q[0];
//!     c[1] = measure q[1];
//! "#;
//!
//! let circuit = parse(source).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//!
//! let emitted = emit(&circuit).unwrap();
//! let reparsed = parse(&emitted).unwrap();
//! assert_eq!(reparsed.dag().num_ops(), circuit.dag().num_ops());
//! ```

mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::{emit, emit_qasm2};
pub use error::{EmitError, ParseError, ParseResult};
pub use parser::parse;
