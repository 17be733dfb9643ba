//! Alsvid transpilation orchestration.
//!
//! One facade dispatching quantum programs across three circuit
//! ecosystems — the native DAG IR (`alsvid-ir` + `alsvid-compile`),
//! the HIQ command-list model (`hiq-circ`), and OpenQASM 3 text
//! (`alsvid-qasm3`) — plus abstract QDMI-style device descriptions.
//! Programs are converted to the chosen backend's native
//! representation, optimized there, converted back, and reported with
//! uniform before/after statistics and a virtual-to-physical mapping.
//!
//! # Example
//!
//! ```rust
//! use alsvid_core::{Alsvid, Program, TranspileRequest};
//! use alsvid_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("pair", 1, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//!
//! let alsvid = Alsvid::new();
//! let result = alsvid
//!     .transpile(&Program::from(circuit), &TranspileRequest::new())
//!     .unwrap();
//!
//! assert_eq!(result.stats.before.n_gates, 2);
//! assert_eq!(result.stats.after.n_gates, 0);
//! ```

pub mod device;
pub mod device_converter;
pub mod error;
pub mod lib_id;
pub mod orchestrator;
pub mod program;
pub mod program_converter;
pub mod transpiler;
pub mod type_registry;

pub use device::{Device, QdmiCoupling, QdmiDevice, QdmiQubit};
pub use device_converter::{DeviceConverter, DeviceConverterRegistry};
pub use error::AlsvidError;
pub use lib_id::LibId;
pub use orchestrator::{Alsvid, TranspileRequest};
pub use program::Program;
pub use program_converter::{ProgramConverter, ProgramConverterRegistry};
pub use transpiler::{
    AlsvidTranspiler, CircuitStats, HiqTranspiler, Qasm3Transpiler, TranspileResult,
    TranspileStats, Transpiler, TranspilerOptions, TranspilerRegistry, VirtualPhysicalMapping,
};
pub use type_registry::{DeviceTypeRegistry, Matcher, ProgramTypeRegistry, TypeRegistry};
