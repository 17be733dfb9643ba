//! Synthesis-level simplification: inverse cancellation and rotation
//! merging.
//!
//! Both passes scan the instruction list in topological order while
//! tracking, per wire, a stack of still-live operations. Cancelling a
//! pair pops the stack, so chains like `H;H;H;H` collapse in a single
//! sweep. Any non-gate operation on a wire (barrier, measure, reset)
//! ends the adjacency and blocks simplification across it.

use rustc_hash::FxHashMap;

use alsvid_ir::{CircuitDag, Instruction, StandardGate, WireId};

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::property::PropertySet;
use crate::unitary::Unitary2x2;

/// Angle below which a merged rotation is dropped entirely.
const ANGLE_EPSILON: f64 = 1e-10;

/// Tracks, for every wire, which live output slots it has passed
/// through, newest last.
#[derive(Default)]
struct WireStacks {
    stacks: FxHashMap<WireId, Vec<usize>>,
}

impl WireStacks {
    fn wires(inst: &Instruction) -> impl Iterator<Item = WireId> + '_ {
        inst.qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(inst.clbits.iter().map(|&c| WireId::Clbit(c)))
    }

    /// The shared top slot of all wires of `inst`, if the tops agree.
    fn common_top(&self, inst: &Instruction) -> Option<usize> {
        let mut tops = Self::wires(inst).map(|w| self.stacks.get(&w).and_then(|s| s.last()));
        let first = tops.next()??;
        for top in tops {
            if top != Some(first) {
                return None;
            }
        }
        Some(*first)
    }

    fn push(&mut self, inst: &Instruction, slot: usize) {
        for wire in Self::wires(inst) {
            self.stacks.entry(wire).or_default().push(slot);
        }
    }

    fn pop(&mut self, inst: &Instruction) {
        for wire in Self::wires(inst) {
            if let Some(stack) = self.stacks.get_mut(&wire) {
                stack.pop();
            }
        }
    }
}

fn rebuild(dag: &mut CircuitDag, slots: Vec<Option<Instruction>>) -> CompileResult<()> {
    let mut rebuilt = dag.empty_like();
    for inst in slots.into_iter().flatten() {
        rebuilt.push(inst)?;
    }
    *dag = rebuilt;
    Ok(())
}

/// Check whether two adjacent standard gates with identical wire
/// coverage cancel to the identity.
fn is_inverse_pair(a: &StandardGate, b: &StandardGate) -> bool {
    use StandardGate::{SX, SXdg, Sdg, T, Tdg, S};

    if a.is_self_inverse() {
        return a == b;
    }
    matches!(
        (a, b),
        (S, Sdg) | (Sdg, S) | (T, Tdg) | (Tdg, T) | (SX, SXdg) | (SXdg, SX)
    )
}

/// Check whether two instructions address the same qubits, treating
/// operand order as irrelevant for symmetric gates.
fn same_operands(prev: &Instruction, next: &Instruction) -> bool {
    if prev.qubits == next.qubits {
        return true;
    }
    let symmetric = matches!(
        next.as_standard_gate(),
        Some(StandardGate::CZ | StandardGate::Swap | StandardGate::RZZ(_))
    );
    if symmetric && prev.qubits.len() == next.qubits.len() {
        let mut a = prev.qubits.clone();
        let mut b = next.qubits.clone();
        a.sort_unstable();
        b.sort_unstable();
        return a == b;
    }
    false
}

/// Cancel adjacent gate pairs that multiply to the identity.
pub struct CancelInverses;

impl Pass for CancelInverses {
    fn name(&self) -> &'static str {
        "CancelInverses"
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let mut slots: Vec<Option<Instruction>> = Vec::with_capacity(dag.num_ops());
        let mut stacks = WireStacks::default();

        for inst in dag.instructions() {
            if let Some(gate) = inst.as_standard_gate() {
                if let Some(top) = stacks.common_top(&inst) {
                    let cancels = slots[top].as_ref().is_some_and(|prev| {
                        prev.as_standard_gate()
                            .is_some_and(|pg| is_inverse_pair(pg, gate) && same_operands(prev, &inst))
                    });
                    if cancels {
                        let prev = slots[top].take().expect("slot checked above");
                        stacks.pop(&prev);
                        continue;
                    }
                }
            }
            let slot = slots.len();
            slots.push(Some(inst.clone()));
            stacks.push(&inst, slot);
        }

        rebuild(dag, slots)
    }
}

/// Merge adjacent same-kind rotations on identical operands and drop
/// the result when the combined angle vanishes.
pub struct MergeRotations;

/// Combine two rotation gates of the same kind, if possible.
fn merged_rotation(prev: &StandardGate, next: &StandardGate) -> Option<StandardGate> {
    use StandardGate::{CP, CRx, CRy, CRz, P, RZZ, Rx, Ry, Rz};

    let gate = match (prev, next) {
        (Rx(a), Rx(b)) => Rx(a + b),
        (Ry(a), Ry(b)) => Ry(a + b),
        (Rz(a), Rz(b)) => Rz(a + b),
        (P(a), P(b)) => P(a + b),
        (CRx(a), CRx(b)) => CRx(a + b),
        (CRy(a), CRy(b)) => CRy(a + b),
        (CRz(a), CRz(b)) => CRz(a + b),
        (CP(a), CP(b)) => CP(a + b),
        (RZZ(a), RZZ(b)) => RZZ(a + b),
        _ => return None,
    };
    Some(gate)
}

impl Pass for MergeRotations {
    fn name(&self) -> &'static str {
        "MergeRotations"
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let mut slots: Vec<Option<Instruction>> = Vec::with_capacity(dag.num_ops());
        let mut stacks = WireStacks::default();

        for inst in dag.instructions() {
            if let Some(gate) = inst.as_standard_gate() {
                if let Some(top) = stacks.common_top(&inst) {
                    let merged = slots[top].as_ref().and_then(|prev| {
                        if !same_operands(prev, &inst) {
                            return None;
                        }
                        prev.as_standard_gate()
                            .and_then(|pg| merged_rotation(pg, gate))
                    });
                    if let Some(gate) = merged {
                        let prev = slots[top].take().expect("slot checked above");
                        stacks.pop(&prev);
                        let angle = gate
                            .rotation_angle()
                            .or_else(|| match &gate {
                                StandardGate::CRx(t)
                                | StandardGate::CRy(t)
                                | StandardGate::CRz(t)
                                | StandardGate::CP(t)
                                | StandardGate::RZZ(t) => Some(*t),
                                _ => None,
                            })
                            .unwrap_or(0.0);
                        if Unitary2x2::normalize_angle(angle).abs() < ANGLE_EPSILON {
                            continue;
                        }
                        let merged_inst = Instruction::gate(gate, prev.qubits.iter().copied());
                        let slot = slots.len();
                        slots.push(Some(merged_inst.clone()));
                        stacks.push(&merged_inst, slot);
                        continue;
                    }
                }
            }
            let slot = slots.len();
            slots.push(Some(inst.clone()));
            stacks.push(&inst, slot);
        }

        rebuild(dag, slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::{Circuit, QubitId};
    use std::f64::consts::PI;

    fn run_cancel(circuit: Circuit) -> CircuitDag {
        let mut dag = circuit.into_dag();
        CancelInverses.run(&mut dag, &mut PropertySet::new()).unwrap();
        dag
    }

    #[test]
    fn test_hh_cancels() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
        assert_eq!(run_cancel(circuit).num_ops(), 0);
    }

    #[test]
    fn test_xx_cancels() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.x(QubitId(0)).unwrap().x(QubitId(0)).unwrap();
        assert_eq!(run_cancel(circuit).num_ops(), 0);
    }

    #[test]
    fn test_nested_cancellation() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap();
        assert_eq!(run_cancel(circuit).num_ops(), 0);
    }

    #[test]
    fn test_s_sdg_cancels() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.s(QubitId(0)).unwrap().sdg(QubitId(0)).unwrap();
        assert_eq!(run_cancel(circuit).num_ops(), 0);
    }

    #[test]
    fn test_cx_pair_cancels() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        assert_eq!(run_cancel(circuit).num_ops(), 0);
    }

    #[test]
    fn test_cx_reversed_does_not_cancel() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .cx(QubitId(1), QubitId(0))
            .unwrap();
        assert_eq!(run_cancel(circuit).num_ops(), 2);
    }

    #[test]
    fn test_cz_reversed_cancels() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit
            .cz(QubitId(0), QubitId(1))
            .unwrap()
            .cz(QubitId(1), QubitId(0))
            .unwrap();
        assert_eq!(run_cancel(circuit).num_ops(), 0);
    }

    #[test]
    fn test_interposed_gate_blocks_cancellation() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .t(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap();
        assert_eq!(run_cancel(circuit).num_ops(), 3);
    }

    #[test]
    fn test_barrier_blocks_cancellation() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier([QubitId(0)]).unwrap();
        circuit.h(QubitId(0)).unwrap();
        assert_eq!(run_cancel(circuit).num_ops(), 3);
    }

    #[test]
    fn test_merge_rotations() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.rz(0.4, QubitId(0)).unwrap().rz(0.3, QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();
        MergeRotations.run(&mut dag, &mut PropertySet::new()).unwrap();

        let insts = dag.instructions();
        assert_eq!(insts.len(), 1);
        assert_eq!(
            insts[0].as_standard_gate(),
            Some(&StandardGate::Rz(0.7000000000000001))
        );
    }

    #[test]
    fn test_opposite_rotations_vanish() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.rx(0.9, QubitId(0)).unwrap().rx(-0.9, QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();
        MergeRotations.run(&mut dag, &mut PropertySet::new()).unwrap();
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_full_turn_vanishes() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.rz(PI, QubitId(0)).unwrap().rz(PI, QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();
        MergeRotations.run(&mut dag, &mut PropertySet::new()).unwrap();
        assert_eq!(dag.num_ops(), 0);
    }
}
