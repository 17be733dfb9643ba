//! Alsvid Compilation and Transpilation Framework
//!
//! Pass-based compilation infrastructure for transforming quantum
//! circuits to run on target hardware. Passes are composed by a
//! [`PassManager`]; the [`PassManagerBuilder`] assembles the standard
//! stack for a given optimization level and target.
//!
//! # Optimization Levels
//!
//! | Level | Passes Included |
//! |-------|-----------------|
//! | 0 | Composite decomposition + rebase only |
//! | 1 | + inverse cancellation, rotation merging (default) |
//! | 2 | + single-qubit run resynthesis, Clifford cleanup |
//! | 3 | + barrier removal, extended-gate-set rebase, second cleanup sweep |
//!
//! When the target has a coupling map, a trivial layout pass and a
//! SWAP-inserting routing pass run before the final rebase, so every
//! two-qubit operation in the output acts on coupled qubit pairs.
//!
//! # Example
//!
//! ```rust
//! use alsvid_compile::{PassManagerBuilder, CouplingMap, GateSet};
//! use alsvid_ir::Circuit;
//!
//! let circuit = Circuit::bell().unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_optimization_level(2)
//!     .with_target(CouplingMap::linear(5), GateSet::standard())
//!     .build();
//!
//! let mut dag = circuit.into_dag();
//! pm.run(&mut dag, &mut props).unwrap();
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;
pub mod target;
pub mod unitary;

pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::Pass;
pub use property::{CouplingMap, GateSet, Layout, PropertySet};
pub use target::Target;
