//! Transpiler for OpenQASM 3 text programs.

use tracing::instrument;

use super::alsvid::run_engine;
use super::stats::AlsvidStatsExtractor;
use super::{TranspileResult, TranspileStats, Transpiler, TranspilerOptions};
use crate::device::Device;
use crate::error::AlsvidError;
use crate::lib_id::LibId;
use crate::program::Program;

/// Transpiles QASM text by parsing into the native IR, driving the
/// alsvid engine, and emitting text back.
///
/// Its native device representation is the alsvid [`Target`]
/// (`alsvid_compile::Target`); device converters for the `qasm3`
/// transpiler produce that form.
pub struct Qasm3Transpiler {
    program_lib: LibId,
}

impl Qasm3Transpiler {
    /// Create the transpiler.
    pub fn new() -> Self {
        Self {
            program_lib: LibId::qasm3(),
        }
    }
}

impl Default for Qasm3Transpiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Transpiler for Qasm3Transpiler {
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
        let text = program.expect_text()?;
        let target = device.map(Device::expect_target).transpose()?;

        let circuit = alsvid_qasm3::parse(text)?;
        let before = AlsvidStatsExtractor::extract_stats_from(&circuit);

        let (transpiled, mapping) = run_engine(&circuit, level, target)?;
        let after = AlsvidStatsExtractor::extract_stats_from(&transpiled);
        let emitted = alsvid_qasm3::emit(&transpiled)?;

        Ok(TranspileResult {
            transpiled_program: Program::Text(emitted),
            stats: TranspileStats { before, after },
            virtual_physical_mapping: mapping,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_in_text_out() {
        let program = Program::from(
            "OPENQASM 3.0;\nqubit[1] q;\nh q[0];\nh q[0];\n",
        );
        let result = Qasm3Transpiler::new()
            .transpile(&program, &TranspilerOptions::new(), None)
            .unwrap();

        assert!(result.transpiled_program.as_text().is_some());
        assert_eq!(result.stats.before.n_gates, 2);
        assert_eq!(result.stats.after.n_gates, 0);
    }

    #[test]
    fn test_parse_failure_propagates() {
        let program = Program::from("OPENQASM 3.0;\nqubit[1] q;\nwarp q[0];\n");
        let err = Qasm3Transpiler::new()
            .transpile(&program, &TranspilerOptions::new(), None)
            .unwrap_err();
        assert!(matches!(err, AlsvidError::Parse(_)));
    }

    #[test]
    fn test_invalid_level_checked_before_parsing() {
        // Even unparsable text must fail on the option first.
        let program = Program::from("not qasm at all");
        let err = Qasm3Transpiler::new()
            .transpile(&program, &TranspilerOptions::optimization(7), None)
            .unwrap_err();
        assert!(matches!(err, AlsvidError::InvalidOptimizationLevel { .. }));
    }
}
