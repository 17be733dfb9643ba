//! Error taxonomy for the orchestration layer.

use thiserror::Error;

use crate::lib_id::LibId;

/// Errors raised by the orchestrator, its registries, and the backend
/// transpilers.
///
/// Everything surfaces synchronously to the caller; nothing is logged
/// and swallowed, and nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlsvidError {
    /// Program auto-detection found no registered match.
    #[error(
        "Could not detect program library. Specify program_lib or register \
         the program type with register_program_type()."
    )]
    ProgramLibNotFound,

    /// Device auto-detection found no registered match.
    #[error(
        "Could not detect device library. Specify device_lib or register \
         the device type with register_device_type()."
    )]
    DeviceLibNotFound,

    /// No program converter for the requested pair.
    #[error("No program converter registered for {src} -> {target}")]
    ConverterNotFound {
        /// Source library.
        src: LibId,
        /// Target library.
        target: LibId,
    },

    /// The pair already has a program converter.
    #[error("A program converter for {src} -> {target} is already registered")]
    ConverterAlreadyRegistered {
        /// Source library.
        src: LibId,
        /// Target library.
        target: LibId,
    },

    /// No device converter for the requested pair.
    #[error("No device converter registered for {src} -> {target}")]
    DeviceConverterNotFound {
        /// Source library.
        src: LibId,
        /// Target library.
        target: LibId,
    },

    /// The pair already has a device converter.
    #[error("A device converter for {src} -> {target} is already registered")]
    DeviceConverterAlreadyRegistered {
        /// Source library.
        src: LibId,
        /// Target library.
        target: LibId,
    },

    /// No transpiler registered under the library id.
    #[error("No transpiler registered for library '{0}'")]
    TranspilerNotFound(LibId),

    /// The library id already has a transpiler.
    #[error("A transpiler for library '{0}' is already registered")]
    TranspilerAlreadyRegistered(LibId),

    /// The device library already has a default transpiler library.
    #[error("A default transpiler library for device library '{0}' is already registered")]
    DefaultTranspilerLibAlreadyRegistered(LibId),

    /// `optimization_level` outside its supported domain.
    #[error("Invalid optimization level: {value} (expected an integer in 0..=3)")]
    InvalidOptimizationLevel {
        /// The rejected value, rendered for the message.
        value: String,
    },

    /// A component received a program or device in the wrong
    /// representation.
    #[error("Expected a {expected} value but received {found}")]
    UnexpectedRepresentation {
        /// Required representation.
        expected: &'static str,
        /// Actual representation.
        found: &'static str,
    },

    /// A device description too malformed to convert.
    #[error("Device '{name}' is unusable: {reason}")]
    InvalidDevice {
        /// Device name.
        name: String,
        /// What is missing or wrong.
        reason: String,
    },

    /// A device was referenced for rebasing without declaring anything
    /// to rebase to.
    #[error("Device '{0}' declares neither a gate set nor an architecture")]
    DeviceMissingGateSet(String),

    /// A physical unit handle could not be resolved to an index.
    #[error("Could not resolve unit '{unit}' to a physical index")]
    UnitResolution {
        /// Rendered unit id.
        unit: String,
    },

    /// Failure inside the native compilation engine.
    #[error(transparent)]
    Compile(#[from] alsvid_compile::CompileError),

    /// Failure converting between circuit models.
    #[error(transparent)]
    Interop(#[from] hiq_circ::InteropError),

    /// Failure inside the HIQ circuit model.
    #[error(transparent)]
    Circ(#[from] hiq_circ::CircError),

    /// Failure parsing QASM text.
    #[error(transparent)]
    Parse(#[from] alsvid_qasm3::ParseError),

    /// Failure emitting QASM text.
    #[error(transparent)]
    Emit(#[from] alsvid_qasm3::EmitError),
}
