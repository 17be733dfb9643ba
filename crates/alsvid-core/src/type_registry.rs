//! Ordered predicate registries for library auto-detection.

use crate::device::Device;
use crate::error::AlsvidError;
use crate::lib_id::LibId;
use crate::program::Program;

/// Predicate deciding whether a value belongs to a library.
pub type Matcher<T> = fn(&T) -> bool;

/// An ordered list of (predicate, library) associations.
///
/// Detection scans the list and returns the association of the LAST
/// matching entry: the most recently registered match wins, so a later
/// registration for the same shape shadows an earlier one. This
/// ordering is part of the public contract and is pinned by tests.
pub struct TypeRegistry<T> {
    entries: Vec<(Matcher<T>, LibId)>,
}

impl<T> Default for TypeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypeRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { entries: vec![] }
    }

    /// Append an association.
    pub fn register(&mut self, lib: LibId, matcher: Matcher<T>) {
        self.entries.push((matcher, lib));
    }

    /// Detect the library of a value; `None` when nothing matches.
    pub fn detect(&self, value: &T) -> Option<LibId> {
        self.entries
            .iter()
            .rev()
            .find(|(matcher, _)| matcher(value))
            .map(|(_, lib)| lib.clone())
    }
}

/// Program-type detection registry.
#[derive(Default)]
pub struct ProgramTypeRegistry {
    inner: TypeRegistry<Program>,
}

impl ProgramTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a program shape for a library.
    pub fn register_type(&mut self, lib: LibId, matcher: Matcher<Program>) {
        self.inner.register(lib, matcher);
    }

    /// Detect the library of a program.
    ///
    /// Never guesses: unmatched programs (including all raw text) fail
    /// with [`AlsvidError::ProgramLibNotFound`].
    pub fn detect_lib(&self, program: &Program) -> Result<LibId, AlsvidError> {
        self.inner.detect(program).ok_or(AlsvidError::ProgramLibNotFound)
    }
}

/// Device-type detection registry.
#[derive(Default)]
pub struct DeviceTypeRegistry {
    inner: TypeRegistry<Device>,
}

impl DeviceTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device shape for a library.
    pub fn register_type(&mut self, lib: LibId, matcher: Matcher<Device>) {
        self.inner.register(lib, matcher);
    }

    /// Detect the library of a device.
    pub fn detect_lib(&self, device: &Device) -> Result<LibId, AlsvidError> {
        self.inner.detect(device).ok_or(AlsvidError::DeviceLibNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::Circuit;

    fn is_circuit(p: &Program) -> bool {
        matches!(p, Program::Circuit(_))
    }

    fn is_text(p: &Program) -> bool {
        matches!(p, Program::Text(_))
    }

    #[test]
    fn test_detection() {
        let mut registry = ProgramTypeRegistry::new();
        registry.register_type(LibId::alsvid(), is_circuit);

        let program = Program::from(Circuit::bell().unwrap());
        assert_eq!(registry.detect_lib(&program).unwrap(), LibId::alsvid());
    }

    #[test]
    fn test_unregistered_shape_fails() {
        let registry = ProgramTypeRegistry::new();
        let program = Program::from("OPENQASM 3.0;");
        let err = registry.detect_lib(&program).unwrap_err();
        assert!(matches!(err, AlsvidError::ProgramLibNotFound));
        assert!(err.to_string().contains("register_program_type"));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ProgramTypeRegistry::new();
        registry.register_type(LibId::new("first"), is_circuit);
        registry.register_type(LibId::new("second"), is_circuit);

        let program = Program::from(Circuit::bell().unwrap());
        assert_eq!(registry.detect_lib(&program).unwrap(), LibId::new("second"));
    }

    #[test]
    fn test_disjoint_registrations_coexist() {
        let mut registry = ProgramTypeRegistry::new();
        registry.register_type(LibId::alsvid(), is_circuit);
        registry.register_type(LibId::qasm3(), is_text);

        assert_eq!(
            registry
                .detect_lib(&Program::from(Circuit::bell().unwrap()))
                .unwrap(),
            LibId::alsvid()
        );
        assert_eq!(
            registry.detect_lib(&Program::from("text")).unwrap(),
            LibId::qasm3()
        );
    }
}
