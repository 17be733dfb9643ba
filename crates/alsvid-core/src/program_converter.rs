//! Program converters and their registry.

use rustc_hash::FxHashMap;
use tracing::debug;

use hiq_circ::interop::{circuit_to_hiq, hiq_to_circuit};

use crate::error::AlsvidError;
use crate::lib_id::LibId;
use crate::program::Program;

/// A stateless conversion between two program representations.
///
/// Converters never mutate their input; output is always a freshly
/// built program. Constructs the target representation cannot express
/// propagate the underlying ecosystem error unchanged.
pub trait ProgramConverter: Send + Sync {
    /// Convert a program into the target representation.
    fn convert(&self, program: &Program) -> Result<Program, AlsvidError>;
}

/// Identity converter synthesized for equal source/target pairs.
#[derive(Default)]
pub struct PassThroughProgramConverter;

impl ProgramConverter for PassThroughProgramConverter {
    fn convert(&self, program: &Program) -> Result<Program, AlsvidError> {
        Ok(program.clone())
    }
}

/// Registry of program converters keyed by (source, target).
///
/// Append-only: duplicate registration fails fast instead of silently
/// shadowing the earlier converter.
#[derive(Default)]
pub struct ProgramConverterRegistry {
    converters: FxHashMap<(LibId, LibId), Box<dyn ProgramConverter>>,
    pass_through: PassThroughProgramConverter,
}

impl ProgramConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            converters: FxHashMap::default(),
            pass_through: PassThroughProgramConverter,
        }
    }

    /// Register a converter for a (source, target) pair.
    pub fn register_converter(
        &mut self,
        source: LibId,
        target: LibId,
        converter: Box<dyn ProgramConverter>,
    ) -> Result<(), AlsvidError> {
        if self.converters.contains_key(&(source.clone(), target.clone())) {
            return Err(AlsvidError::ConverterAlreadyRegistered { src: source, target });
        }
        debug!("Registering program converter {} -> {}", source, target);
        self.converters.insert((source, target), converter);
        Ok(())
    }

    /// Look up the converter for a pair.
    ///
    /// Equal pairs resolve to a pass-through converter without any
    /// registration.
    pub fn get_converter(
        &self,
        source: &LibId,
        target: &LibId,
    ) -> Result<&dyn ProgramConverter, AlsvidError> {
        if source == target {
            return Ok(&self.pass_through);
        }
        self.converters
            .get(&(source.clone(), target.clone()))
            .map(AsRef::as_ref)
            .ok_or_else(|| AlsvidError::ConverterNotFound {
                src: source.clone(),
                target: target.clone(),
            })
    }
}

/// alsvid circuit -> HIQ circuit.
pub struct CircuitToHiqConverter;

impl ProgramConverter for CircuitToHiqConverter {
    fn convert(&self, program: &Program) -> Result<Program, AlsvidError> {
        let circuit = program.expect_circuit()?;
        Ok(Program::Hiq(circuit_to_hiq(circuit)?))
    }
}

/// HIQ circuit -> alsvid circuit.
pub struct HiqToCircuitConverter;

impl ProgramConverter for HiqToCircuitConverter {
    fn convert(&self, program: &Program) -> Result<Program, AlsvidError> {
        let circuit = program.expect_hiq()?;
        Ok(Program::Circuit(hiq_to_circuit(circuit)?))
    }
}

/// alsvid circuit -> OpenQASM 3 text.
pub struct CircuitToQasm3Converter;

impl ProgramConverter for CircuitToQasm3Converter {
    fn convert(&self, program: &Program) -> Result<Program, AlsvidError> {
        let circuit = program.expect_circuit()?;
        Ok(Program::Text(alsvid_qasm3::emit(circuit)?))
    }
}

/// OpenQASM 3 text -> alsvid circuit.
pub struct Qasm3ToCircuitConverter;

impl ProgramConverter for Qasm3ToCircuitConverter {
    fn convert(&self, program: &Program) -> Result<Program, AlsvidError> {
        let text = program.expect_text()?;
        Ok(Program::Circuit(alsvid_qasm3::parse(text)?))
    }
}

/// HIQ circuit -> OpenQASM 3 text, via the native IR.
pub struct HiqToQasm3Converter;

impl ProgramConverter for HiqToQasm3Converter {
    fn convert(&self, program: &Program) -> Result<Program, AlsvidError> {
        let circuit = hiq_to_circuit(program.expect_hiq()?)?;
        Ok(Program::Text(alsvid_qasm3::emit(&circuit)?))
    }
}

/// OpenQASM 3 text -> HIQ circuit, via the native IR.
pub struct Qasm3ToHiqConverter;

impl ProgramConverter for Qasm3ToHiqConverter {
    fn convert(&self, program: &Program) -> Result<Program, AlsvidError> {
        let circuit = alsvid_qasm3::parse(program.expect_text()?)?;
        Ok(Program::Hiq(circuit_to_hiq(&circuit)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::Circuit;

    #[test]
    fn test_pass_through_for_equal_pair() {
        let registry = ProgramConverterRegistry::new();
        let converter = registry.get_converter(&LibId::alsvid(), &LibId::alsvid()).unwrap();

        let program = Program::from(Circuit::bell().unwrap());
        let converted = converter.convert(&program).unwrap();
        assert_eq!(
            converted.as_circuit().unwrap().num_qubits(),
            program.as_circuit().unwrap().num_qubits()
        );
    }

    #[test]
    fn test_missing_pair_fails() {
        let registry = ProgramConverterRegistry::new();
        let err = registry.get_converter(&LibId::alsvid(), &LibId::hiq()).err().unwrap();
        assert!(matches!(err, AlsvidError::ConverterNotFound { .. }));
        assert!(err.to_string().contains("alsvid -> hiq"));
    }

    #[test]
    fn test_duplicate_registration_fails_and_first_stays() {
        let mut registry = ProgramConverterRegistry::new();
        registry
            .register_converter(LibId::alsvid(), LibId::hiq(), Box::new(CircuitToHiqConverter))
            .unwrap();
        let err = registry
            .register_converter(LibId::alsvid(), LibId::hiq(), Box::new(CircuitToHiqConverter))
            .unwrap_err();
        assert!(matches!(err, AlsvidError::ConverterAlreadyRegistered { .. }));

        // The original registration still resolves.
        assert!(registry.get_converter(&LibId::alsvid(), &LibId::hiq()).is_ok());
    }

    #[test]
    fn test_circuit_hiq_round_trip_counts() {
        let program = Program::from(Circuit::ghz(3).unwrap());
        let hiq = CircuitToHiqConverter.convert(&program).unwrap();
        let back = HiqToCircuitConverter.convert(&hiq).unwrap();

        let original = program.as_circuit().unwrap();
        let returned = back.as_circuit().unwrap();
        assert_eq!(returned.num_qubits(), original.num_qubits());
        assert_eq!(returned.dag().num_ops(), original.dag().num_ops());
    }

    #[test]
    fn test_text_converters() {
        let program = Program::from(
            "OPENQASM 3.0;\nqubit[2] q;\nh q[0];\ncx q[0], q[1];\n",
        );
        let as_hiq = Qasm3ToHiqConverter.convert(&program).unwrap();
        assert_eq!(as_hiq.as_hiq().unwrap().n_gates(), 2);

        let text = HiqToQasm3Converter.convert(&as_hiq).unwrap();
        assert!(text.as_text().unwrap().contains("cx q[0], q[1];"));
    }

    #[test]
    fn test_parse_failure_propagates() {
        let program = Program::from("OPENQASM 3.0; qubit[1] q; warp q[0];");
        let err = Qasm3ToCircuitConverter.convert(&program).unwrap_err();
        assert!(matches!(err, AlsvidError::Parse(_)));
    }

    #[test]
    fn test_wrong_representation_rejected() {
        let program = Program::from("not a circuit object");
        let err = CircuitToHiqConverter.convert(&program).unwrap_err();
        assert!(matches!(err, AlsvidError::UnexpectedRepresentation { .. }));
    }
}
