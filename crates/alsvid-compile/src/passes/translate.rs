//! Gate set rebase pass.

use alsvid_ir::{CircuitDag, Gate, Instruction, InstructionKind, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::passes::peephole::{gate_to_unitary, zyz_gates};
use crate::property::{GateSet, PropertySet};
use crate::unitary::Unitary2x2;

use std::f64::consts::PI;

/// Maximum rewrite depth per original instruction.
const MAX_REWRITE_DEPTH: usize = 16;

/// Tolerance for dropping near-zero rotation angles.
const EPSILON: f64 = 1e-10;

/// Rewrite every gate into the target gate set.
///
/// The target is the property set's gate set when one is present
/// (i.e. a device declared one); otherwise the configured fallback.
/// Non-gate operations (measure, reset, barrier, delay) pass through
/// untouched.
pub struct Rebase {
    /// Target used when the property set declares none.
    fallback: GateSet,
}

impl Rebase {
    /// Create a rebase pass with the given fallback target.
    pub fn new(fallback: GateSet) -> Self {
        Self { fallback }
    }
}

fn q(ids: &[QubitId], i: usize) -> QubitId {
    ids[i]
}

/// One rewrite step toward the target set. Returns `None` when the
/// gate has no structural rule and must go through single-qubit
/// resynthesis.
fn rewrite_step(
    gate: &StandardGate,
    ids: &[QubitId],
    target: &GateSet,
) -> CompileResult<Option<Vec<Instruction>>> {
    use StandardGate as G;

    let one = |g: G, i: usize| Instruction::single_qubit_gate(g, q(ids, i));
    let two = |g: G, a: usize, b: usize| Instruction::two_qubit_gate(g, q(ids, a), q(ids, b));

    let rewritten = match gate {
        G::CY => vec![one(G::Sdg, 1), two(G::CX, 0, 1), one(G::S, 1)],
        G::CZ if target.contains("cx") => vec![one(G::H, 1), two(G::CX, 0, 1), one(G::H, 1)],
        G::CX if target.contains("cz") => vec![one(G::H, 1), two(G::CZ, 0, 1), one(G::H, 1)],
        G::CH => vec![
            one(G::S, 1),
            one(G::H, 1),
            one(G::T, 1),
            two(G::CX, 0, 1),
            one(G::Tdg, 1),
            one(G::H, 1),
            one(G::Sdg, 1),
        ],
        G::Swap => vec![two(G::CX, 0, 1), two(G::CX, 1, 0), two(G::CX, 0, 1)],
        G::ISwap => vec![
            one(G::S, 0),
            one(G::S, 1),
            one(G::H, 0),
            two(G::CX, 0, 1),
            two(G::CX, 1, 0),
            one(G::H, 1),
        ],
        G::CRx(theta) => vec![
            one(G::H, 1),
            one(G::Rz(theta / 2.0), 1),
            two(G::CX, 0, 1),
            one(G::Rz(-theta / 2.0), 1),
            two(G::CX, 0, 1),
            one(G::H, 1),
        ],
        G::CRy(theta) => vec![
            one(G::Ry(theta / 2.0), 1),
            two(G::CX, 0, 1),
            one(G::Ry(-theta / 2.0), 1),
            two(G::CX, 0, 1),
        ],
        G::CRz(theta) => vec![
            one(G::Rz(theta / 2.0), 1),
            two(G::CX, 0, 1),
            one(G::Rz(-theta / 2.0), 1),
            two(G::CX, 0, 1),
        ],
        G::CP(theta) => vec![
            one(G::P(theta / 2.0), 0),
            two(G::CX, 0, 1),
            one(G::P(-theta / 2.0), 1),
            two(G::CX, 0, 1),
            one(G::P(theta / 2.0), 1),
        ],
        G::RZZ(theta) => vec![two(G::CX, 0, 1), one(G::Rz(*theta), 1), two(G::CX, 0, 1)],
        G::CCX => vec![
            one(G::H, 2),
            two(G::CX, 1, 2),
            one(G::Tdg, 2),
            two(G::CX, 0, 2),
            one(G::T, 2),
            two(G::CX, 1, 2),
            one(G::Tdg, 2),
            two(G::CX, 0, 2),
            one(G::T, 1),
            one(G::T, 2),
            one(G::H, 2),
            two(G::CX, 0, 1),
            one(G::T, 0),
            one(G::Tdg, 1),
            two(G::CX, 0, 1),
        ],
        G::CSwap => vec![
            two(G::CX, 2, 1),
            Instruction::gate(G::CCX, [ids[0], ids[1], ids[2]]),
            two(G::CX, 2, 1),
        ],
        G::CX | G::CZ => {
            return Err(CompileError::UnsupportedGate {
                gate: gate.name().to_string(),
            });
        }
        _ => return Ok(None),
    };
    Ok(Some(rewritten))
}

/// Express a single-qubit gate in whatever one-qubit basis the target
/// offers: `u`, `rz`+`ry`, or `rz`+`sx`.
fn resynthesize_1q(
    gate: &StandardGate,
    qubit: QubitId,
    target: &GateSet,
) -> CompileResult<Vec<Instruction>> {
    let unitary = gate_to_unitary(gate).ok_or_else(|| CompileError::UnsupportedGate {
        gate: gate.name().to_string(),
    })?;
    if unitary.is_identity() {
        return Ok(vec![]);
    }

    let (alpha, beta, gamma, _phase) = unitary.zyz_decomposition();
    let alpha = Unitary2x2::normalize_angle(alpha);
    let beta = Unitary2x2::normalize_angle(beta);
    let gamma = Unitary2x2::normalize_angle(gamma);

    if target.contains("u") {
        return Ok(vec![Instruction::single_qubit_gate(
            StandardGate::U(beta, alpha, gamma),
            qubit,
        )]);
    }

    if target.contains("rz") && target.contains("ry") {
        return Ok(zyz_gates(&unitary)
            .into_iter()
            .map(|g| Instruction::single_qubit_gate(g, qubit))
            .collect());
    }

    if target.contains("rz") && target.contains("sx") {
        // Rz(alpha)·Ry(beta)·Rz(gamma) =
        //   Rz(alpha + pi)·SX·Rz(beta + pi)·SX·Rz(gamma)  (up to phase)
        let mut gates = Vec::new();
        if beta.abs() < EPSILON {
            let total = Unitary2x2::normalize_angle(alpha + gamma);
            if total.abs() > EPSILON {
                gates.push(StandardGate::Rz(total));
            }
        } else {
            let z1 = Unitary2x2::normalize_angle(gamma);
            let z2 = Unitary2x2::normalize_angle(beta + PI);
            let z3 = Unitary2x2::normalize_angle(alpha + PI);
            if z1.abs() > EPSILON {
                gates.push(StandardGate::Rz(z1));
            }
            gates.push(StandardGate::SX);
            if z2.abs() > EPSILON {
                gates.push(StandardGate::Rz(z2));
            }
            gates.push(StandardGate::SX);
            if z3.abs() > EPSILON {
                gates.push(StandardGate::Rz(z3));
            }
        }
        return Ok(gates
            .into_iter()
            .map(|g| Instruction::single_qubit_gate(g, qubit))
            .collect());
    }

    Err(CompileError::UnsupportedGate {
        gate: gate.name().to_string(),
    })
}

fn rebase_instruction(
    inst: &Instruction,
    target: &GateSet,
    depth: usize,
    out: &mut Vec<Instruction>,
) -> CompileResult<()> {
    if depth > MAX_REWRITE_DEPTH {
        return Err(CompileError::UnsupportedGate {
            gate: inst.name().to_string(),
        });
    }

    let gate = match &inst.kind {
        InstructionKind::Gate(Gate::Standard(gate)) => gate,
        InstructionKind::Gate(Gate::Composite(composite)) => {
            // Composite gates are normally gone before rebase; inline
            // any stragglers.
            for body_inst in &composite.body {
                let mapped = body_inst.remapped(|local| inst.qubits[local.0 as usize]);
                rebase_instruction(&mapped, target, depth + 1, out)?;
            }
            return Ok(());
        }
        _ => {
            out.push(inst.clone());
            return Ok(());
        }
    };

    if target.contains(gate.name()) {
        out.push(inst.clone());
        return Ok(());
    }

    if let Some(rewritten) = rewrite_step(gate, &inst.qubits, target)? {
        for step in rewritten {
            rebase_instruction(&step, target, depth + 1, out)?;
        }
        return Ok(());
    }

    if gate.num_qubits() == 1 {
        out.extend(resynthesize_1q(gate, inst.qubits[0], target)?);
        return Ok(());
    }

    Err(CompileError::UnsupportedGate {
        gate: gate.name().to_string(),
    })
}

impl Pass for Rebase {
    fn name(&self) -> &'static str {
        "Rebase"
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let target = properties.gate_set.clone().unwrap_or_else(|| self.fallback.clone());

        let instructions = dag.instructions();
        let mut out = Vec::with_capacity(instructions.len());
        for inst in &instructions {
            rebase_instruction(inst, &target, 0, &mut out)?;
        }

        let mut rebuilt = dag.empty_like();
        for inst in out {
            rebuilt.push(inst)?;
        }
        *dag = rebuilt;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::Circuit;

    fn rebase_with(circuit: Circuit, target: GateSet) -> CircuitDag {
        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new().with_gate_set(target);
        Rebase::new(GateSet::standard()).run(&mut dag, &mut props).unwrap();
        dag
    }

    #[test]
    fn test_gates_in_target_untouched() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let dag = rebase_with(circuit, GateSet::standard());
        assert_eq!(dag.num_ops(), 2);
    }

    #[test]
    fn test_ccx_decomposes_at_standard_target() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        let dag = rebase_with(circuit, GateSet::standard());

        assert!(dag.num_ops() > 1);
        for (_, inst) in dag.topological_ops() {
            assert!(GateSet::standard().contains(inst.name()));
        }
    }

    #[test]
    fn test_cx_to_cz_device() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let target = GateSet::new(["h", "cz"]);
        let dag = rebase_with(circuit, target.clone());

        for (_, inst) in dag.topological_ops() {
            assert!(target.contains(inst.name()), "{} not in target", inst.name());
        }
    }

    #[test]
    fn test_1q_resynthesis_to_rz_sx() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        let target = GateSet::new(["rz", "sx", "cx"]);
        let dag = rebase_with(circuit, target.clone());

        assert!(dag.num_ops() >= 1);
        for (_, inst) in dag.topological_ops() {
            assert!(target.contains(inst.name()), "{} not in target", inst.name());
        }
    }

    #[test]
    fn test_unexpressible_gate_fails() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new().with_gate_set(GateSet::new(["rz", "sx"]));
        let result = Rebase::new(GateSet::standard()).run(&mut dag, &mut props);
        assert!(matches!(result, Err(CompileError::UnsupportedGate { .. })));
    }

    #[test]
    fn test_measure_passes_through() {
        let circuit = Circuit::bell().unwrap();
        let dag = rebase_with(circuit, GateSet::new(["h", "cx"]));
        let measures = dag
            .topological_ops()
            .filter(|(_, inst)| inst.is_measure())
            .count();
        assert_eq!(measures, 2);
    }
}
