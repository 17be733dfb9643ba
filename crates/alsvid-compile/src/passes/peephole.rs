//! Peephole optimization: single-qubit run resynthesis and Clifford
//! pair cleanup.

use rustc_hash::FxHashMap;

use alsvid_ir::{CircuitDag, Instruction, QubitId, StandardGate, WireId};

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::property::PropertySet;
use crate::unitary::Unitary2x2;

/// Tolerance for dropping near-zero Euler angles.
const EPSILON: f64 = 1e-10;

/// Get the unitary matrix for a single-qubit standard gate.
pub(crate) fn gate_to_unitary(gate: &StandardGate) -> Option<Unitary2x2> {
    let u = match gate {
        StandardGate::I => Unitary2x2::identity(),
        StandardGate::X => Unitary2x2::x(),
        StandardGate::Y => Unitary2x2::y(),
        StandardGate::Z => Unitary2x2::z(),
        StandardGate::H => Unitary2x2::h(),
        StandardGate::S => Unitary2x2::s(),
        StandardGate::Sdg => Unitary2x2::sdg(),
        StandardGate::T => Unitary2x2::t(),
        StandardGate::Tdg => Unitary2x2::tdg(),
        StandardGate::SX => Unitary2x2::sx(),
        StandardGate::SXdg => Unitary2x2::sxdg(),
        StandardGate::Rx(t) => Unitary2x2::rx(*t),
        StandardGate::Ry(t) => Unitary2x2::ry(*t),
        StandardGate::Rz(t) => Unitary2x2::rz(*t),
        StandardGate::P(t) => Unitary2x2::p(*t),
        StandardGate::U(t, p, l) => Unitary2x2::u(*t, *p, *l),
        _ => return None,
    };
    Some(u)
}

/// Emit the minimal Rz/Ry/Rz sequence for a unitary, in application
/// order. Returns an empty vector for (phase-equivalent) identity.
pub(crate) fn zyz_gates(unitary: &Unitary2x2) -> Vec<StandardGate> {
    if unitary.is_identity() {
        return vec![];
    }
    let (alpha, beta, gamma, _phase) = unitary.zyz_decomposition();
    let alpha = Unitary2x2::normalize_angle(alpha);
    let beta = Unitary2x2::normalize_angle(beta);
    let gamma = Unitary2x2::normalize_angle(gamma);

    let mut gates = Vec::new();
    if gamma.abs() > EPSILON {
        gates.push(StandardGate::Rz(gamma));
    }
    if beta.abs() > EPSILON {
        gates.push(StandardGate::Ry(beta));
    }
    if alpha.abs() > EPSILON {
        gates.push(StandardGate::Rz(alpha));
    }
    gates
}

/// Resynthesize runs of consecutive single-qubit gates.
///
/// Each maximal run is multiplied out and re-emitted as at most three
/// rotations; the replacement is applied only when it is strictly
/// shorter than the run it replaces.
pub struct Optimize1qRuns;

enum Slot {
    Keep(Instruction),
    Drop,
    Replace(Vec<Instruction>),
}

impl Pass for Optimize1qRuns {
    fn name(&self) -> &'static str {
        "Optimize1qRuns"
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let instructions = dag.instructions();
        let mut slots: Vec<Slot> = Vec::with_capacity(instructions.len());
        // Open run per qubit: slot indices of its gates, oldest first.
        let mut runs: FxHashMap<QubitId, Vec<usize>> = FxHashMap::default();
        let mut finished: Vec<Vec<usize>> = Vec::new();

        for inst in &instructions {
            let single = inst.qubits.len() == 1
                && inst.clbits.is_empty()
                && inst.as_standard_gate().is_some_and(|g| gate_to_unitary(g).is_some());
            if single {
                let slot = slots.len();
                slots.push(Slot::Keep(inst.clone()));
                runs.entry(inst.qubits[0]).or_default().push(slot);
                continue;
            }

            // Any other operation ends the open runs on its qubits.
            for &qubit in &inst.qubits {
                if let Some(run) = runs.remove(&qubit) {
                    finished.push(run);
                }
            }
            slots.push(Slot::Keep(inst.clone()));
        }
        finished.extend(runs.into_values());

        for run in finished {
            if run.len() < 2 {
                continue;
            }
            let mut combined = Unitary2x2::identity();
            let mut qubit = QubitId(0);
            for &slot in &run {
                if let Slot::Keep(inst) = &slots[slot] {
                    qubit = inst.qubits[0];
                    let gate = inst.as_standard_gate().expect("run holds standard gates");
                    combined = gate_to_unitary(gate).expect("run holds unitary gates") * combined;
                }
            }
            let replacement: Vec<Instruction> = zyz_gates(&combined)
                .into_iter()
                .map(|g| Instruction::single_qubit_gate(g, qubit))
                .collect();
            if replacement.len() < run.len() {
                for (i, &slot) in run.iter().enumerate() {
                    slots[slot] = if i == 0 {
                        Slot::Replace(replacement.clone())
                    } else {
                        Slot::Drop
                    };
                }
            }
        }

        let mut rebuilt = dag.empty_like();
        for slot in slots {
            match slot {
                Slot::Keep(inst) => {
                    rebuilt.push(inst)?;
                }
                Slot::Drop => {}
                Slot::Replace(insts) => {
                    for inst in insts {
                        rebuilt.push(inst)?;
                    }
                }
            }
        }
        *dag = rebuilt;
        Ok(())
    }
}

/// Rewrite adjacent Clifford pairs into shorter equivalents.
///
/// The pair table is exact (no global-phase drift): S·S = Z,
/// T·T = S, SX·SX = X and the dagger counterparts.
pub struct CliffordSimp;

fn pair_rewrite(first: &StandardGate, second: &StandardGate) -> Option<StandardGate> {
    use StandardGate::{SX, SXdg, Sdg, T, Tdg, S, X, Z};

    match (first, second) {
        (S, S) | (Sdg, Sdg) => Some(Z),
        (T, T) => Some(S),
        (Tdg, Tdg) => Some(Sdg),
        (SX, SX) | (SXdg, SXdg) => Some(X),
        _ => None,
    }
}

impl Pass for CliffordSimp {
    fn name(&self) -> &'static str {
        "CliffordSimp"
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let mut out: Vec<Instruction> = Vec::with_capacity(dag.num_ops());
        // Index of the last live op per wire; pair rewrites only apply
        // when the previous op on the qubit is the immediate neighbor.
        let mut last: FxHashMap<WireId, usize> = FxHashMap::default();

        for inst in dag.instructions() {
            if inst.qubits.len() == 1 && inst.clbits.is_empty() {
                if let Some(gate) = inst.as_standard_gate() {
                    let wire = WireId::Qubit(inst.qubits[0]);
                    let rewritten = last.get(&wire).copied().and_then(|idx| {
                        let prev = &out[idx];
                        if prev.qubits == inst.qubits && prev.clbits.is_empty() {
                            prev.as_standard_gate().and_then(|pg| pair_rewrite(pg, gate))
                        } else {
                            None
                        }
                    });
                    if let Some(gate) = rewritten {
                        let idx = last[&wire];
                        out[idx] = Instruction::single_qubit_gate(gate, inst.qubits[0]);
                        continue;
                    }
                }
            }
            let idx = out.len();
            for wire in inst
                .qubits
                .iter()
                .map(|&q| WireId::Qubit(q))
                .chain(inst.clbits.iter().map(|&c| WireId::Clbit(c)))
            {
                last.insert(wire, idx);
            }
            out.push(inst);
        }

        let mut rebuilt = dag.empty_like();
        for inst in out {
            rebuilt.push(inst)?;
        }
        *dag = rebuilt;
        Ok(())
    }
}
