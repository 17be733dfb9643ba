//! Optimisation passes over command-list circuits.
//!
//! Unlike the alsvid engine these are free functions; the HIQ
//! ecosystem composes them directly.

use rand::Rng;
use rustc_hash::FxHashMap;
use std::f64::consts::PI;
use std::time::{Duration, Instant};

use crate::circuit::{Command, HiqCircuit};
use crate::error::{CircError, CircResult};
use crate::op::Op;
use crate::unit::UnitId;

/// Angle below which a merged rotation is dropped.
const ANGLE_EPSILON: f64 = 1e-10;

fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Inline every `CircBox` into its defining circuit.
pub fn decompose_boxes(circuit: &mut HiqCircuit) {
    fn inline(command: &Command, out: &mut Vec<Command>) {
        if let Op::CircBox(inner) = &command.op {
            let positions: FxHashMap<&UnitId, usize> = inner
                .qubits()
                .iter()
                .enumerate()
                .map(|(i, u)| (u, i))
                .collect();
            for boxed in inner.commands() {
                let mapped = Command {
                    op: boxed.op.clone(),
                    args: boxed
                        .args
                        .iter()
                        .map(|u| {
                            positions
                                .get(u)
                                .map_or_else(|| u.clone(), |&i| command.args[i].clone())
                        })
                        .collect(),
                };
                inline(&mapped, out);
            }
        } else {
            out.push(command.clone());
        }
    }

    let mut out = Vec::with_capacity(circuit.commands().len());
    for command in circuit.commands() {
        inline(command, &mut out);
    }
    circuit.set_commands(out);
}

fn same_args(a: &Command, b: &Command) -> bool {
    if a.args == b.args {
        return true;
    }
    if b.op.is_symmetric() && a.args.len() == b.args.len() {
        let mut x = a.args.clone();
        let mut y = b.args.clone();
        x.sort_by(|p, q| p.register.cmp(&q.register).then(p.index.cmp(&q.index)));
        y.sort_by(|p, q| p.register.cmp(&q.register).then(p.index.cmp(&q.index)));
        return x == y;
    }
    false
}

/// Cancel adjacent inverse pairs and merge adjacent rotations.
///
/// A single sweep with per-unit live stacks; cancelling a pair exposes
/// the one before it, so nested redundancy collapses in one call.
pub fn synthesise(circuit: &mut HiqCircuit) {
    let mut slots: Vec<Option<Command>> = Vec::with_capacity(circuit.commands().len());
    let mut stacks: FxHashMap<UnitId, Vec<usize>> = FxHashMap::default();

    let common_top = |stacks: &FxHashMap<UnitId, Vec<usize>>, command: &Command| -> Option<usize> {
        let mut tops = command.args.iter().map(|u| stacks.get(u).and_then(|s| s.last()));
        let first = tops.next()??;
        for top in tops {
            if top != Some(first) {
                return None;
            }
        }
        Some(*first)
    };

    for command in circuit.commands().iter().cloned() {
        if command.op.is_gate() && !matches!(command.op, Op::CircBox(_)) {
            if let Some(top) = common_top(&stacks, &command) {
                if let Some(prev) = slots[top].clone() {
                    if same_args(&prev, &command) {
                        if prev.op.cancels_with(&command.op) {
                            slots[top] = None;
                            for unit in &prev.args {
                                if let Some(stack) = stacks.get_mut(unit) {
                                    stack.pop();
                                }
                            }
                            continue;
                        }
                        if let Some(merged) = prev.op.merged(&command.op) {
                            let angle = merged.angle().unwrap_or(0.0);
                            if wrap_angle(angle).abs() < ANGLE_EPSILON {
                                slots[top] = None;
                                for unit in &prev.args {
                                    if let Some(stack) = stacks.get_mut(unit) {
                                        stack.pop();
                                    }
                                }
                            } else {
                                slots[top] = Some(Command {
                                    op: merged,
                                    args: prev.args.clone(),
                                });
                            }
                            continue;
                        }
                    }
                }
            }
        }
        let slot = slots.len();
        for unit in &command.args {
            stacks.entry(unit.clone()).or_default().push(slot);
        }
        slots.push(Some(command));
    }

    circuit.set_commands(slots.into_iter().flatten().collect());
}

/// Rewrite adjacent Clifford pairs into shorter exact equivalents.
pub fn clifford_simp(circuit: &mut HiqCircuit) {
    fn pair(first: &Op, second: &Op) -> Option<Op> {
        match (first, second) {
            (Op::S, Op::S) | (Op::Sdg, Op::Sdg) => Some(Op::Z),
            (Op::T, Op::T) => Some(Op::S),
            (Op::Tdg, Op::Tdg) => Some(Op::Sdg),
            (Op::V, Op::V) | (Op::Vdg, Op::Vdg) => Some(Op::X),
            _ => None,
        }
    }

    let mut out: Vec<Command> = Vec::with_capacity(circuit.commands().len());
    let mut last: FxHashMap<UnitId, usize> = FxHashMap::default();

    for command in circuit.commands().iter().cloned() {
        if command.args.len() == 1 && command.op.is_gate() {
            let unit = &command.args[0];
            let rewritten = last.get(unit).copied().and_then(|idx| {
                let prev = &out[idx];
                if prev.args == command.args {
                    pair(&prev.op, &command.op)
                } else {
                    None
                }
            });
            if let Some(op) = rewritten {
                let idx = last[unit];
                out[idx] = Command {
                    op,
                    args: command.args.clone(),
                };
                continue;
            }
        }
        let idx = out.len();
        for unit in &command.args {
            last.insert(unit.clone(), idx);
        }
        out.push(command);
    }

    circuit.set_commands(out);
}

/// Full peephole: iterate synthesis and Clifford cleanup to a fixed
/// point (bounded).
pub fn full_peephole(circuit: &mut HiqCircuit) {
    for _ in 0..10 {
        let before = circuit.commands().len();
        synthesise(circuit);
        clifford_simp(circuit);
        synthesise(circuit);
        if circuit.commands().len() == before {
            break;
        }
    }
}

/// Strip barriers.
pub fn remove_barriers(circuit: &mut HiqCircuit) {
    let commands = circuit
        .commands()
        .iter()
        .filter(|c| !matches!(c.op, Op::Barrier))
        .cloned()
        .collect();
    circuit.set_commands(commands);
}

/// Maximum rewrite depth per command during rebase.
const MAX_REWRITE_DEPTH: usize = 16;

/// Rewrite gates into the named target set.
///
/// `CircBox` contents are inlined first. One-qubit gates outside the
/// set are not resynthesized in this model; they fail.
pub fn rebase(circuit: &mut HiqCircuit, gate_set: &[String]) -> CircResult<()> {
    decompose_boxes(circuit);

    let in_set = |name: &str| gate_set.iter().any(|g| g == name);

    fn rewrite(
        command: &Command,
        in_set: &dyn Fn(&str) -> bool,
        depth: usize,
        out: &mut Vec<Command>,
    ) -> CircResult<()> {
        if depth > MAX_REWRITE_DEPTH {
            return Err(CircError::UnsupportedOp(command.op.name().to_string()));
        }
        if !command.op.is_gate() || in_set(command.op.name()) {
            out.push(command.clone());
            return Ok(());
        }

        let a = &command.args;
        let one = |op: Op, i: usize| Command {
            op,
            args: vec![a[i].clone()],
        };
        let two = |op: Op, i: usize, j: usize| Command {
            op,
            args: vec![a[i].clone(), a[j].clone()],
        };

        let steps: Vec<Command> = match &command.op {
            Op::CY => vec![one(Op::Sdg, 1), two(Op::CX, 0, 1), one(Op::S, 1)],
            Op::CZ if in_set("CX") => vec![one(Op::H, 1), two(Op::CX, 0, 1), one(Op::H, 1)],
            Op::CX if in_set("CZ") => vec![one(Op::H, 1), two(Op::CZ, 0, 1), one(Op::H, 1)],
            Op::CH => vec![
                one(Op::S, 1),
                one(Op::H, 1),
                one(Op::T, 1),
                two(Op::CX, 0, 1),
                one(Op::Tdg, 1),
                one(Op::H, 1),
                one(Op::Sdg, 1),
            ],
            Op::Swap => vec![two(Op::CX, 0, 1), two(Op::CX, 1, 0), two(Op::CX, 0, 1)],
            Op::CRz(t) => vec![
                one(Op::Rz(t / 2.0), 1),
                two(Op::CX, 0, 1),
                one(Op::Rz(-t / 2.0), 1),
                two(Op::CX, 0, 1),
            ],
            Op::CU1(t) => vec![
                one(Op::U1(t / 2.0), 0),
                two(Op::CX, 0, 1),
                one(Op::U1(-t / 2.0), 1),
                two(Op::CX, 0, 1),
                one(Op::U1(t / 2.0), 1),
            ],
            Op::ZZPhase(t) => vec![two(Op::CX, 0, 1), one(Op::Rz(*t), 1), two(Op::CX, 0, 1)],
            Op::CCX => vec![
                one(Op::H, 2),
                two(Op::CX, 1, 2),
                one(Op::Tdg, 2),
                two(Op::CX, 0, 2),
                one(Op::T, 2),
                two(Op::CX, 1, 2),
                one(Op::Tdg, 2),
                two(Op::CX, 0, 2),
                one(Op::T, 1),
                one(Op::T, 2),
                one(Op::H, 2),
                two(Op::CX, 0, 1),
                one(Op::T, 0),
                one(Op::Tdg, 1),
                two(Op::CX, 0, 1),
            ],
            Op::CSwap => vec![
                two(Op::CX, 2, 1),
                Command {
                    op: Op::CCX,
                    args: vec![a[0].clone(), a[1].clone(), a[2].clone()],
                },
                two(Op::CX, 2, 1),
            ],
            other => return Err(CircError::UnsupportedOp(other.name().to_string())),
        };

        for step in steps {
            rewrite(&step, in_set, depth + 1, out)?;
        }
        Ok(())
    }

    let mut out = Vec::with_capacity(circuit.commands().len());
    for command in circuit.commands() {
        rewrite(command, &in_set, 0, &mut out)?;
    }
    circuit.set_commands(out);
    Ok(())
}

/// Configuration for the global Pauli simplification pass.
#[derive(Debug, Clone)]
pub struct PauliSimpConfig {
    /// Wall-clock budget for all trials.
    pub timeout: Duration,
    /// Number of randomized trials.
    pub trials: u32,
}

impl Default for PauliSimpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            trials: 10,
        }
    }
}

/// Whether two adjacent commands may be exchanged without changing
/// circuit semantics.
fn commutes(a: &Command, b: &Command) -> bool {
    if !a.op.is_gate() || !b.op.is_gate() {
        return false;
    }
    if a.args.iter().all(|u| !b.args.contains(u)) {
        return true;
    }
    if a.op.is_diagonal() && b.op.is_diagonal() {
        return true;
    }
    // Diagonal single-qubit ops commute through a CX control; X-axis
    // single-qubit ops commute through a CX target.
    let through_cx = |cx: &Command, other: &Command| {
        if !matches!(cx.op, Op::CX) || other.args.len() != 1 {
            return false;
        }
        let unit = &other.args[0];
        (other.op.is_diagonal() && unit == &cx.args[0])
            || (matches!(other.op, Op::X | Op::Rx(_) | Op::V | Op::Vdg) && unit == &cx.args[1])
    };
    through_cx(a, b) || through_cx(b, a)
}

/// Global Pauli-style simplification.
///
/// Runs randomized commuting-reorder trials followed by synthesis and
/// keeps the best circuit seen. Strictly only-reducing: if no trial
/// beats the input, the input is returned unchanged. Trials stop when
/// the wall-clock budget is exhausted; hitting the deadline is not an
/// error.
pub fn pauli_simp(circuit: &mut HiqCircuit, config: &PauliSimpConfig) {
    let deadline = Instant::now() + config.timeout;
    let mut best: Option<HiqCircuit> = None;
    let mut rng = rand::thread_rng();

    for _ in 0..config.trials {
        if Instant::now() >= deadline {
            break;
        }
        let mut trial = circuit.clone();
        let sweeps = rng.gen_range(1..=3);
        for _ in 0..sweeps {
            let mut commands: Vec<Command> = trial.commands().to_vec();
            for i in 1..commands.len() {
                if rng.gen_bool(0.5) && commutes(&commands[i - 1], &commands[i]) {
                    commands.swap(i - 1, i);
                }
            }
            trial.set_commands(commands);
        }
        full_peephole(&mut trial);
        if trial.n_gates() < best.as_ref().map_or(circuit.n_gates(), HiqCircuit::n_gates) {
            best = Some(trial);
        }
    }

    if let Some(best) = best {
        if best.n_gates() < circuit.n_gates() {
            *circuit = best;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_qubit(ops: &[Op]) -> HiqCircuit {
        let mut circuit = HiqCircuit::new("test");
        circuit.add_qubits(1);
        for op in ops {
            circuit.push(op.clone(), vec![UnitId::qubit(0)]).unwrap();
        }
        circuit
    }

    #[test]
    fn test_synthesise_cancels_hh() {
        let mut circuit = one_qubit(&[Op::H, Op::H]);
        synthesise(&mut circuit);
        assert_eq!(circuit.n_gates(), 0);
    }

    #[test]
    fn test_synthesise_cancels_nested() {
        let mut circuit = one_qubit(&[Op::H, Op::X, Op::X, Op::H]);
        synthesise(&mut circuit);
        assert_eq!(circuit.n_gates(), 0);
    }

    #[test]
    fn test_synthesise_merges_rotations() {
        let mut circuit = one_qubit(&[Op::Rz(0.25), Op::Rz(-0.25)]);
        synthesise(&mut circuit);
        assert_eq!(circuit.n_gates(), 0);
    }

    #[test]
    fn test_barrier_blocks_synthesis() {
        let mut circuit = HiqCircuit::new("test");
        circuit.add_qubits(1);
        circuit.push(Op::H, vec![UnitId::qubit(0)]).unwrap();
        circuit.push(Op::Barrier, vec![UnitId::qubit(0)]).unwrap();
        circuit.push(Op::H, vec![UnitId::qubit(0)]).unwrap();
        synthesise(&mut circuit);
        assert_eq!(circuit.n_gates(), 2);
    }

    #[test]
    fn test_decompose_boxes() {
        let mut inner = HiqCircuit::new("inner");
        inner.add_qubits(2);
        inner.push(Op::H, vec![UnitId::qubit(0)]).unwrap();
        inner
            .push(Op::CX, vec![UnitId::qubit(0), UnitId::qubit(1)])
            .unwrap();

        let mut circuit = HiqCircuit::new("outer");
        circuit.add_qubits(3);
        circuit
            .push(
                Op::CircBox(Box::new(inner)),
                vec![UnitId::qubit(2), UnitId::qubit(0)],
            )
            .unwrap();

        decompose_boxes(&mut circuit);

        let commands = circuit.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].op, Op::H);
        assert_eq!(commands[0].args, vec![UnitId::qubit(2)]);
        assert_eq!(commands[1].args, vec![UnitId::qubit(2), UnitId::qubit(0)]);
    }

    #[test]
    fn test_clifford_simp_pairs() {
        let mut circuit = one_qubit(&[Op::S, Op::S]);
        clifford_simp(&mut circuit);
        assert_eq!(circuit.commands()[0].op, Op::Z);
    }

    #[test]
    fn test_full_peephole_chains() {
        // S;S -> Z, then Z;Z cancels.
        let mut circuit = one_qubit(&[Op::S, Op::S, Op::Z]);
        full_peephole(&mut circuit);
        assert_eq!(circuit.n_gates(), 0);
    }

    #[test]
    fn test_rebase_cx_to_cz() {
        let mut circuit = HiqCircuit::new("test");
        circuit.add_qubits(2);
        circuit
            .push(Op::CX, vec![UnitId::qubit(0), UnitId::qubit(1)])
            .unwrap();

        rebase(&mut circuit, &["H".into(), "CZ".into()]).unwrap();
        for command in circuit.commands() {
            assert!(matches!(command.op, Op::H | Op::CZ));
        }
    }

    #[test]
    fn test_rebase_unsupported_fails() {
        let mut circuit = one_qubit(&[Op::T]);
        let result = rebase(&mut circuit, &["CX".into()]);
        assert!(matches!(result, Err(CircError::UnsupportedOp(_))));
    }

    #[test]
    fn test_pauli_simp_only_reduces() {
        let mut circuit = HiqCircuit::new("test");
        circuit.add_qubits(2);
        circuit.push(Op::H, vec![UnitId::qubit(0)]).unwrap();
        circuit
            .push(Op::CX, vec![UnitId::qubit(0), UnitId::qubit(1)])
            .unwrap();
        let before = circuit.n_gates();

        pauli_simp(&mut circuit, &PauliSimpConfig::default());
        assert!(circuit.n_gates() <= before);
    }

    #[test]
    fn test_pauli_simp_commutes_rz_through_cx() {
        let mut circuit = HiqCircuit::new("test");
        circuit.add_qubits(2);
        circuit.push(Op::Rz(0.5), vec![UnitId::qubit(0)]).unwrap();
        circuit
            .push(Op::CX, vec![UnitId::qubit(0), UnitId::qubit(1)])
            .unwrap();
        circuit.push(Op::Rz(-0.5), vec![UnitId::qubit(0)]).unwrap();

        let config = PauliSimpConfig {
            timeout: Duration::from_secs(5),
            trials: 64,
        };
        pauli_simp(&mut circuit, &config);
        assert_eq!(circuit.n_gates(), 1);
    }

    #[test]
    fn test_pauli_simp_zero_budget_is_noop() {
        let mut circuit = one_qubit(&[Op::H, Op::H]);
        let config = PauliSimpConfig {
            timeout: Duration::ZERO,
            trials: 10,
        };
        pauli_simp(&mut circuit, &config);
        assert_eq!(circuit.n_gates(), 2);
    }
}
