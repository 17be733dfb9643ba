//! Transpiler backed by the native pass-based engine.

use tracing::instrument;

use alsvid_compile::{CompileError, PassManagerBuilder, Target};
use alsvid_ir::Circuit;

use super::layout::AlsvidLayoutMapper;
use super::stats::AlsvidStatsExtractor;
use super::{TranspileResult, TranspileStats, Transpiler, TranspilerOptions};
use crate::device::Device;
use crate::error::AlsvidError;
use crate::lib_id::LibId;
use crate::program::Program;

/// Transpiles native DAG circuits with the alsvid compilation engine.
pub struct AlsvidTranspiler {
    program_lib: LibId,
}

impl AlsvidTranspiler {
    /// Create the transpiler.
    pub fn new() -> Self {
        Self {
            program_lib: LibId::alsvid(),
        }
    }
}

impl Default for AlsvidTranspiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the native engine over a clone of `circuit`.
///
/// Shared with the text backend, which drives the same engine after
/// parsing. Returns the transpiled circuit and the mapping derived
/// from the final layout.
pub(crate) fn run_engine(
    circuit: &Circuit,
    level: u8,
    target: Option<&Target>,
) -> Result<(Circuit, super::VirtualPhysicalMapping), AlsvidError> {
    if let Some(target) = target {
        if circuit.num_qubits() > target.num_qubits() as usize {
            return Err(AlsvidError::Compile(CompileError::CircuitTooLarge {
                required: circuit.num_qubits(),
                available: target.num_qubits(),
            }));
        }
    }

    let mut builder = PassManagerBuilder::new().with_optimization_level(level);
    if let Some(target) = target {
        builder = builder.with_device(target);
    }
    let (pass_manager, mut properties) = builder.build();

    let mut dag = circuit.clone().into_dag();
    pass_manager.run(&mut dag, &mut properties)?;
    let transpiled = Circuit::from_dag(circuit.name(), dag);

    let mapping =
        AlsvidLayoutMapper::mapping_from_layout(&transpiled, properties.layout.as_ref());
    Ok((transpiled, mapping))
}

impl Transpiler for AlsvidTranspiler {
    fn program_lib(&self) -> &LibId {
        &self.program_lib
    }

    #[instrument(skip_all)]
    fn transpile(
        &self,
        program: &Program,
        options: &TranspilerOptions,
        device: Option<&Device>,
    ) -> Result<TranspileResult, AlsvidError> {
        let level = options.optimization_level()?;
        let circuit = program.expect_circuit()?;
        let target = device.map(Device::expect_target).transpose()?;

        let before = AlsvidStatsExtractor::extract_stats_from(circuit);
        let (transpiled, mapping) = run_engine(circuit, level, target)?;
        let after = AlsvidStatsExtractor::extract_stats_from(&transpiled);

        Ok(TranspileResult {
            transpiled_program: Program::Circuit(transpiled),
            stats: TranspileStats { before, after },
            virtual_physical_mapping: mapping,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_compile::{CouplingMap, GateSet};
    use alsvid_ir::QubitId;

    fn hh_program() -> Program {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
        Program::Circuit(circuit)
    }

    #[test]
    fn test_redundant_pair_cancelled_at_default_level() {
        let result = AlsvidTranspiler::new()
            .transpile(&hh_program(), &TranspilerOptions::new(), None)
            .unwrap();

        assert_eq!(result.stats.before.n_gates, 2);
        assert_eq!(result.stats.after.n_gates, 0);
    }

    #[test]
    fn test_level_zero_preserves_gates() {
        let result = AlsvidTranspiler::new()
            .transpile(&hh_program(), &TranspilerOptions::optimization(0), None)
            .unwrap();
        assert_eq!(result.stats.after.n_gates, 2);
    }

    #[test]
    fn test_invalid_level_fails_before_work() {
        let err = AlsvidTranspiler::new()
            .transpile(&hh_program(), &TranspilerOptions::optimization(99), None)
            .unwrap_err();
        assert!(matches!(err, AlsvidError::InvalidOptimizationLevel { .. }));
    }

    #[test]
    fn test_input_not_mutated() {
        let program = hh_program();
        let _ = AlsvidTranspiler::new()
            .transpile(&program, &TranspilerOptions::new(), None)
            .unwrap();
        assert_eq!(program.as_circuit().unwrap().dag().num_ops(), 2);
    }

    #[test]
    fn test_identity_mapping_without_device() {
        let result = AlsvidTranspiler::new()
            .transpile(&hh_program(), &TranspilerOptions::new(), None)
            .unwrap();
        assert_eq!(result.virtual_physical_mapping.qubit_mapping[&0], 0);
    }

    #[test]
    fn test_device_routing_adjacent_pair() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.cx(QubitId(1), QubitId(0)).unwrap();

        let target = Target::new("pair", 2)
            .with_gate_set(GateSet::new(["cx"]))
            .with_coupling(CouplingMap::from_edges(2, [(0, 1)]));

        let result = AlsvidTranspiler::new()
            .transpile(
                &Program::Circuit(circuit),
                &TranspilerOptions::optimization(2),
                Some(&Device::Target(target)),
            )
            .unwrap();

        assert_eq!(result.stats.after.n_gates_2q, 1);
        assert_eq!(result.stats.after.n_gates, 1);
        assert_eq!(result.virtual_physical_mapping.qubit_mapping[&0], 0);
        assert_eq!(result.virtual_physical_mapping.qubit_mapping[&1], 1);
    }

    #[test]
    fn test_circuit_too_large_for_device() {
        let circuit = Circuit::with_size("big", 5, 0);
        let target = Target::new("tiny", 2).with_gate_set(GateSet::standard());

        let err = AlsvidTranspiler::new()
            .transpile(
                &Program::Circuit(circuit),
                &TranspilerOptions::new(),
                Some(&Device::Target(target)),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            AlsvidError::Compile(CompileError::CircuitTooLarge { .. })
        ));
    }
}
