//! Placement and routing against an architecture.

use rustc_hash::FxHashMap;

use crate::architecture::Architecture;
use crate::circuit::{Command, HiqCircuit};
use crate::error::{CircError, CircResult};
use crate::op::Op;
use crate::unit::UnitId;

/// Place a circuit on an architecture and route it.
///
/// Placement is trivial (logical qubit i starts on node i). The routed
/// circuit is expressed over physical `node[..]` units; SWAPs are
/// inserted along shortest paths ahead of any two-qubit gate whose
/// operands are not coupled. Returns the routed circuit and the final
/// map from each original qubit unit to its physical node unit.
pub fn place_and_route(
    circuit: &HiqCircuit,
    architecture: &Architecture,
) -> CircResult<(HiqCircuit, FxHashMap<UnitId, UnitId>)> {
    let n_logical = circuit.n_qubits();
    if n_logical > architecture.n_nodes() as usize {
        return Err(CircError::TooManyQubits {
            required: n_logical,
            available: architecture.n_nodes(),
        });
    }

    // logical index -> physical node, and the inverse.
    let mut to_phys: Vec<u32> = (0..u32::try_from(n_logical).unwrap_or(u32::MAX)).collect();
    let mut to_logical: FxHashMap<u32, usize> = to_phys
        .iter()
        .enumerate()
        .map(|(l, &p)| (p, l))
        .collect();

    let logical_index: FxHashMap<&UnitId, usize> = circuit
        .qubits()
        .iter()
        .enumerate()
        .map(|(i, u)| (u, i))
        .collect();

    let mut routed = HiqCircuit::new(circuit.name());
    routed.set_qubits((0..architecture.n_nodes()).map(UnitId::node).collect());
    for bit in circuit.bits() {
        routed.add_bit_unit(bit.clone());
    }

    let mut commands: Vec<Command> = Vec::with_capacity(circuit.commands().len());

    for command in circuit.commands() {
        let qubit_args: Vec<usize> = command
            .args
            .iter()
            .filter_map(|u| logical_index.get(u).copied())
            .collect();

        if command.op.is_gate() && qubit_args.len() == 2 {
            let p0 = to_phys[qubit_args[0]];
            let p1 = to_phys[qubit_args[1]];
            if !architecture.is_connected(p0, p1) {
                let path = architecture
                    .shortest_path(p0, p1)
                    .ok_or(CircError::NoPath(p0, p1))?;
                for hop in 0..path.len().saturating_sub(2) {
                    let here = path[hop];
                    let next = path[hop + 1];
                    match to_logical.get(&next).copied() {
                        Some(occupant) => {
                            commands.push(Command {
                                op: Op::Swap,
                                args: vec![UnitId::node(here), UnitId::node(next)],
                            });
                            let mover = to_logical[&here];
                            to_phys[mover] = next;
                            to_phys[occupant] = here;
                            to_logical.insert(next, mover);
                            to_logical.insert(here, occupant);
                        }
                        None => {
                            let mover = to_logical[&here];
                            to_phys[mover] = next;
                            to_logical.remove(&here);
                            to_logical.insert(next, mover);
                        }
                    }
                }
            }
        }

        // Rewrite arguments onto physical nodes at their current
        // positions; bits pass through.
        let args = command
            .args
            .iter()
            .map(|u| {
                logical_index
                    .get(u)
                    .map_or_else(|| u.clone(), |&l| UnitId::node(to_phys[l]))
            })
            .collect();
        commands.push(Command {
            op: command.op.clone(),
            args,
        });
    }

    for command in commands {
        routed.push(command.op, command.args)?;
    }

    let final_map: FxHashMap<UnitId, UnitId> = circuit
        .qubits()
        .iter()
        .enumerate()
        .map(|(l, u)| (u.clone(), UnitId::node(to_phys[l])))
        .collect();

    Ok((routed, final_map))
}
