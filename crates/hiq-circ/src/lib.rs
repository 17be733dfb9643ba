//! HIQ command-list circuit model.
//!
//! A deliberately different object model from `alsvid-ir`: circuits
//! are flat command lists, qubits and bits are register-named
//! [`UnitId`]s whose index is a short sequence, composite structure is
//! expressed with [`Op::CircBox`], and optimisation is a set of free
//! functions over circuits rather than a pass manager.
//!
//! # Example
//!
//! ```rust
//! use hiq_circ::{HiqCircuit, Op, UnitId};
//!
//! let mut circuit = HiqCircuit::new("bell");
//! circuit.add_qubits(2);
//! circuit.push(Op::H, vec![UnitId::qubit(0)]).unwrap();
//! circuit.push(Op::CX, vec![UnitId::qubit(0), UnitId::qubit(1)]).unwrap();
//!
//! assert_eq!(circuit.n_gates(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```

pub mod architecture;
pub mod circuit;
pub mod error;
pub mod interop;
pub mod op;
pub mod passes;
pub mod routing;
pub mod unit;

pub use architecture::{Architecture, BackendInfo};
pub use circuit::{Command, HiqCircuit};
pub use error::{CircError, CircResult, InteropError};
pub use op::Op;
pub use routing::place_and_route;
pub use unit::UnitId;
