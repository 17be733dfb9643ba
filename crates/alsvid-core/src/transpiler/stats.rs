//! Statistics extraction per backend.

use alsvid_ir::Circuit;
use hiq_circ::HiqCircuit;

use super::CircuitStats;

/// Instruction names excluded from gate counts in the native IR.
///
/// The literal name set of the non-unitary operations; `initialize`
/// and control-flow blocks are listed for forward compatibility even
/// though the IR does not currently produce them.
const NON_GATE_OPERATIONS: &[&str] = &[
    "measure",
    "reset",
    "barrier",
    "delay",
    "initialize",
    "if_else",
    "for_loop",
    "while_loop",
    "switch_case",
];

/// Extract statistics from native DAG circuits.
pub struct AlsvidStatsExtractor;

impl AlsvidStatsExtractor {
    /// Count qubits, gates by arity, and depth.
    ///
    /// Gates on three or more qubits count in `n_gates` but in neither
    /// arity bucket; only exact-arity instructions are bucketed.
    pub fn extract_stats_from(circuit: &Circuit) -> CircuitStats {
        let mut n_gates = 0;
        let mut n_gates_1q = 0;
        let mut n_gates_2q = 0;

        for (_, instruction) in circuit.dag().topological_ops() {
            if NON_GATE_OPERATIONS.contains(&instruction.name()) {
                continue;
            }
            n_gates += 1;
            match instruction.qubits.len() {
                1 => n_gates_1q += 1,
                2 => n_gates_2q += 1,
                _ => {}
            }
        }

        CircuitStats {
            n_qubits: circuit.num_qubits(),
            n_gates,
            n_gates_1q,
            n_gates_2q,
            depth: circuit.depth(),
        }
    }
}

/// Extract statistics from HIQ command-list circuits.
pub struct HiqStatsExtractor;

impl HiqStatsExtractor {
    /// Count qubits, gates by arity, and depth.
    pub fn extract_stats_from(circuit: &HiqCircuit) -> CircuitStats {
        let mut n_gates = 0;
        let mut n_gates_1q = 0;
        let mut n_gates_2q = 0;

        for command in circuit.commands() {
            if !command.op.is_gate() {
                continue;
            }
            n_gates += 1;
            match command.args.len() {
                1 => n_gates_1q += 1,
                2 => n_gates_2q += 1,
                _ => {}
            }
        }

        CircuitStats {
            n_qubits: circuit.n_qubits(),
            n_gates,
            n_gates_1q,
            n_gates_2q,
            depth: circuit.depth(),
        }
    }
}
