//! Transpiler backed by the HIQ pass functions.

use tracing::instrument;

use hiq_circ::passes::{
    PauliSimpConfig, decompose_boxes, full_peephole, pauli_simp, rebase, remove_barriers,
    synthesise,
};
use hiq_circ::{CircError, place_and_route};

use super::layout::HiqLayoutMapper;
use super::stats::HiqStatsExtractor;
use super::{TranspileResult, TranspileStats, Transpiler, TranspilerOptions};
use crate::device::Device;
use crate::error::AlsvidError;
use crate::lib_id::LibId;
use crate::program::Program;

/// Transpiles HIQ command-list circuits with the HIQ pass set.
///
/// Level stack: boxes are always decomposed first; level 1 adds
/// synthesis, level 2 the full peephole with Clifford cleanup, level 3
/// barrier removal plus the deadline-bounded Pauli simplification.
pub struct HiqTranspiler {
    program_lib: LibId,
    pauli_config: PauliSimpConfig,
}

impl HiqTranspiler {
    /// Create the transpiler with the default Pauli-simplification
    /// budget (300 s, 10 trials).
    pub fn new() -> Self {
        Self {
            program_lib: LibId::hiq(),
            pauli_config: PauliSimpConfig::default(),
        }
    }

    /// Override the Pauli-simplification budget.
    #[must_use]
    pub fn with_pauli_config(mut self, config: PauliSimpConfig) -> Self {
        self.pauli_config = config;
        self
    }
}

impl Default for HiqTranspiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Transpiler for HiqTranspiler {
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
        let input = program.expect_hiq()?;
        let backend = device.map(Device::expect_hiq).transpose()?;

        if let Some(info) = backend {
            if info.gate_set().is_empty() && info.architecture().is_none() {
                return Err(AlsvidError::DeviceMissingGateSet(info.name().to_string()));
            }
        }

        let before = HiqStatsExtractor::extract_stats_from(input);

        let mut working = input.clone();
        decompose_boxes(&mut working);
        match level {
            0 => {}
            1 => synthesise(&mut working),
            2 => full_peephole(&mut working),
            _ => {
                remove_barriers(&mut working);
                full_peephole(&mut working);
                pauli_simp(&mut working, &self.pauli_config);
            }
        }

        let mut final_map = None;
        if let Some(info) = backend {
            if let Some(architecture) = info.architecture() {
                let (routed, map) = place_and_route(&working, architecture)?;
                working = routed;
                final_map = Some(map);
            } else if working.n_qubits() > info.n_nodes() as usize {
                return Err(AlsvidError::Circ(CircError::TooManyQubits {
                    required: working.n_qubits(),
                    available: info.n_nodes(),
                }));
            }
            if !info.gate_set().is_empty() {
                rebase(&mut working, info.gate_set())?;
            }
        }

        let after = HiqStatsExtractor::extract_stats_from(&working);
        let mapping = match &final_map {
            Some(map) => HiqLayoutMapper::mapping_from_final_map(input, &working, map)?,
            None => HiqLayoutMapper::identity(&working),
        };

        Ok(TranspileResult {
            transpiled_program: Program::Hiq(working),
            stats: TranspileStats { before, after },
            virtual_physical_mapping: mapping,
        })
    }
}
