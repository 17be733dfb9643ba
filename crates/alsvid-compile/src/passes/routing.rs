//! Routing pass inserting SWAP gates to satisfy connectivity.

use alsvid_ir::{CircuitDag, Instruction, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::property::PropertySet;

/// Greedy shortest-path SWAP routing.
///
/// Rebuilds the circuit in topological order. Before each two-qubit
/// gate whose operands are not coupled, SWAPs are inserted along a
/// shortest path to bring them adjacent, and the layout is updated to
/// track the moves. When a path hop lands on a physical qubit with no
/// logical occupant, the logical qubit is relabeled into the free slot
/// without emitting a SWAP.
pub struct SwapRouting;

impl Pass for SwapRouting {
    fn name(&self) -> &'static str {
        "SwapRouting"
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        let layout = properties
            .layout
            .as_mut()
            .ok_or(CompileError::MissingLayout)?;

        let instructions = dag.instructions();
        let mut routed = dag.empty_like();

        for inst in instructions {
            if inst.is_gate() && inst.qubits.len() == 2 {
                let q0 = inst.qubits[0];
                let q1 = inst.qubits[1];
                let p0 = layout.get_physical(q0).ok_or(CompileError::MissingLayout)?;
                let p1 = layout.get_physical(q1).ok_or(CompileError::MissingLayout)?;

                if !coupling.is_connected(p0, p1) {
                    let path = coupling
                        .shortest_path(p0, p1)
                        .ok_or(CompileError::RoutingFailed { qubit1: p0, qubit2: p1 })?;

                    // Walk q0 toward q1, stopping one hop short.
                    for hop in 0..path.len().saturating_sub(2) {
                        let here = path[hop];
                        let next = path[hop + 1];
                        let logical_here = layout
                            .get_logical(here)
                            .ok_or(CompileError::MissingLayout)?;

                        match layout.get_logical(next) {
                            Some(logical_next) => {
                                routed.push(Instruction::two_qubit_gate(
                                    StandardGate::Swap,
                                    logical_here,
                                    logical_next,
                                ))?;
                                layout.swap(here, next);
                            }
                            None => {
                                // Free slot: relabel instead of swapping.
                                layout.add(logical_here, next);
                            }
                        }
                    }
                }
            }
            routed.push(inst)?;
        }

        *dag = routed;
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.coupling_map.is_some() && properties.layout.is_some()
    }
}
