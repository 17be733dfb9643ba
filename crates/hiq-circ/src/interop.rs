//! Conversions between the alsvid IR and the HIQ command-list model.
//!
//! These are the canonical conversion entry points wrapped by the
//! orchestration layer's converters. Conversion never mutates its
//! input; unsupported constructs fail rather than being silently
//! approximated.

use alsvid_ir::{
    Circuit, ClbitId, CompositeGate, Gate, Instruction, InstructionKind, QubitId, StandardGate,
};

use crate::circuit::HiqCircuit;
use crate::error::InteropError;
use crate::op::Op;
use crate::unit::UnitId;

/// Convert an alsvid circuit into a HIQ circuit.
///
/// Gates map one-to-one where the vocabulary overlaps (`sx` -> `V`,
/// `p` -> `U1`, `rzz` -> `ZZPhase`); the universal `u` gate expands to
/// its Z-Y-Z rotations; composite gates become boxes. Gates with no
/// HIQ equivalent (`iswap`, `crx`, `cry`) propagate an error.
pub fn circuit_to_hiq(circuit: &Circuit) -> Result<HiqCircuit, InteropError> {
    let mut out = HiqCircuit::new(circuit.name());
    out.add_qubits(u32::try_from(circuit.num_qubits()).unwrap_or(u32::MAX));
    out.add_bits(u32::try_from(circuit.num_clbits()).unwrap_or(u32::MAX));

    for instruction in circuit.dag().instructions() {
        push_instruction(&mut out, &instruction)?;
    }
    Ok(out)
}

fn push_instruction(out: &mut HiqCircuit, instruction: &Instruction) -> Result<(), InteropError> {
    let qubit_args: Vec<UnitId> = instruction.qubits.iter().map(|q| UnitId::qubit(q.0)).collect();

    match &instruction.kind {
        InstructionKind::Gate(Gate::Standard(gate)) => {
            if let StandardGate::U(theta, phi, lambda) = gate {
                // No universal gate in the HIQ vocabulary; emit its
                // Z-Y-Z factorization.
                let unit = qubit_args[0].clone();
                for op in [Op::Rz(*lambda), Op::Ry(*theta), Op::Rz(*phi)] {
                    out.push(op, vec![unit.clone()])
                        .map_err(|e| InteropError::Rebuild(e.to_string()))?;
                }
                return Ok(());
            }
            let op = standard_to_op(gate)?;
            out.push(op, qubit_args)
                .map_err(|e| InteropError::Rebuild(e.to_string()))
        }
        InstructionKind::Gate(Gate::Composite(composite)) => {
            let mut inner = HiqCircuit::new(composite.name.clone());
            inner.add_qubits(composite.num_qubits);
            for body_inst in &composite.body {
                push_instruction(&mut inner, body_inst)?;
            }
            out.push(Op::CircBox(Box::new(inner)), qubit_args)
                .map_err(|e| InteropError::Rebuild(e.to_string()))
        }
        InstructionKind::Measure => {
            let bit = UnitId::bit(instruction.clbits[0].0);
            out.push(Op::Measure, vec![qubit_args[0].clone(), bit])
                .map_err(|e| InteropError::Rebuild(e.to_string()))
        }
        InstructionKind::Reset => out
            .push(Op::Reset, qubit_args)
            .map_err(|e| InteropError::Rebuild(e.to_string())),
        InstructionKind::Barrier => out
            .push(Op::Barrier, qubit_args)
            .map_err(|e| InteropError::Rebuild(e.to_string())),
        InstructionKind::Delay { .. } => {
            Err(InteropError::UnsupportedOperation("delay".to_string()))
        }
    }
}

fn standard_to_op(gate: &StandardGate) -> Result<Op, InteropError> {
    let op = match gate {
        StandardGate::I => Op::U1(0.0),
        StandardGate::X => Op::X,
        StandardGate::Y => Op::Y,
        StandardGate::Z => Op::Z,
        StandardGate::H => Op::H,
        StandardGate::S => Op::S,
        StandardGate::Sdg => Op::Sdg,
        StandardGate::T => Op::T,
        StandardGate::Tdg => Op::Tdg,
        StandardGate::SX => Op::V,
        StandardGate::SXdg => Op::Vdg,
        StandardGate::Rx(t) => Op::Rx(*t),
        StandardGate::Ry(t) => Op::Ry(*t),
        StandardGate::Rz(t) => Op::Rz(*t),
        StandardGate::P(t) => Op::U1(*t),
        StandardGate::CX => Op::CX,
        StandardGate::CY => Op::CY,
        StandardGate::CZ => Op::CZ,
        StandardGate::CH => Op::CH,
        StandardGate::Swap => Op::Swap,
        StandardGate::CRz(t) => Op::CRz(*t),
        StandardGate::CP(t) => Op::CU1(*t),
        StandardGate::RZZ(t) => Op::ZZPhase(*t),
        StandardGate::CCX => Op::CCX,
        StandardGate::CSwap => Op::CSwap,
        // `U` is expanded by the caller before reaching this table.
        other => {
            return Err(InteropError::UnsupportedOperation(other.name().to_string()));
        }
    };
    Ok(op)
}

/// Convert a HIQ circuit into an alsvid circuit.
///
/// Unit ids are flattened positionally: the i-th declared qubit
/// becomes `QubitId(i)` regardless of register naming, which makes the
/// conversion total over routed (`node[..]`) circuits too.
pub fn hiq_to_circuit(circuit: &HiqCircuit) -> Result<Circuit, InteropError> {
    let mut out = Circuit::with_size(
        circuit.name(),
        u32::try_from(circuit.n_qubits()).unwrap_or(u32::MAX),
        u32::try_from(circuit.n_bits()).unwrap_or(u32::MAX),
    );

    let qubit_of = |unit: &UnitId| -> Result<QubitId, InteropError> {
        circuit
            .qubits()
            .iter()
            .position(|u| u == unit)
            .map(|i| QubitId(u32::try_from(i).unwrap_or(u32::MAX)))
            .ok_or_else(|| InteropError::Rebuild(format!("unknown qubit unit {unit}")))
    };
    let bit_of = |unit: &UnitId| -> Result<ClbitId, InteropError> {
        circuit
            .bits()
            .iter()
            .position(|u| u == unit)
            .map(|i| ClbitId(u32::try_from(i).unwrap_or(u32::MAX)))
            .ok_or_else(|| InteropError::Rebuild(format!("unknown bit unit {unit}")))
    };

    for command in circuit.commands() {
        let instruction = match &command.op {
            Op::Measure => {
                Instruction::measure(qubit_of(&command.args[0])?, bit_of(&command.args[1])?)
            }
            Op::Reset => Instruction::reset(qubit_of(&command.args[0])?),
            Op::Barrier => {
                let qubits: Result<Vec<_>, _> = command.args.iter().map(&qubit_of).collect();
                Instruction::barrier(qubits?)
            }
            Op::CircBox(inner) => {
                let inner_circuit = hiq_to_circuit(inner)?;
                let body = inner_circuit.dag().instructions();
                let composite = CompositeGate::new(
                    inner.name(),
                    u32::try_from(inner.n_qubits()).unwrap_or(u32::MAX),
                    body,
                );
                let qubits: Result<Vec<_>, _> = command.args.iter().map(&qubit_of).collect();
                Instruction::gate(composite, qubits?)
            }
            gate => {
                let standard = op_to_standard(gate)?;
                let qubits: Result<Vec<_>, _> = command.args.iter().map(&qubit_of).collect();
                Instruction::gate(standard, qubits?)
            }
        };
        out.apply(instruction)
            .map_err(|e| InteropError::Rebuild(e.to_string()))?;
    }
    Ok(out)
}

fn op_to_standard(op: &Op) -> Result<StandardGate, InteropError> {
    let gate = match op {
        Op::H => StandardGate::H,
        Op::X => StandardGate::X,
        Op::Y => StandardGate::Y,
        Op::Z => StandardGate::Z,
        Op::S => StandardGate::S,
        Op::Sdg => StandardGate::Sdg,
        Op::T => StandardGate::T,
        Op::Tdg => StandardGate::Tdg,
        Op::V => StandardGate::SX,
        Op::Vdg => StandardGate::SXdg,
        Op::Rx(t) => StandardGate::Rx(*t),
        Op::Ry(t) => StandardGate::Ry(*t),
        Op::Rz(t) => StandardGate::Rz(*t),
        Op::U1(t) => StandardGate::P(*t),
        Op::CX => StandardGate::CX,
        Op::CY => StandardGate::CY,
        Op::CZ => StandardGate::CZ,
        Op::CH => StandardGate::CH,
        Op::Swap => StandardGate::Swap,
        Op::CRz(t) => StandardGate::CRz(*t),
        Op::CU1(t) => StandardGate::CP(*t),
        Op::ZZPhase(t) => StandardGate::RZZ(*t),
        Op::CCX => StandardGate::CCX,
        Op::CSwap => StandardGate::CSwap,
        other => {
            return Err(InteropError::UnsupportedOperation(other.name().to_string()));
        }
    };
    Ok(gate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_round_trip() {
        let circuit = Circuit::bell().unwrap();
        let hiq = circuit_to_hiq(&circuit).unwrap();

        assert_eq!(hiq.n_qubits(), 2);
        assert_eq!(hiq.n_bits(), 2);
        assert_eq!(hiq.n_gates(), 2);

        let back = hiq_to_circuit(&hiq).unwrap();
        assert_eq!(back.num_qubits(), circuit.num_qubits());
        assert_eq!(back.dag().num_ops(), circuit.dag().num_ops());
        assert_eq!(back.depth(), circuit.depth());
    }

    #[test]
    fn test_vocabulary_mapping() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.sx(QubitId(0)).unwrap();
        circuit.p(0.5, QubitId(0)).unwrap();
        circuit.rzz(0.25, QubitId(0), QubitId(1)).unwrap();

        let hiq = circuit_to_hiq(&circuit).unwrap();
        let names: Vec<&str> = hiq.commands().iter().map(|c| c.op.name()).collect();
        assert_eq!(names, vec!["V", "U1", "ZZPhase"]);
    }

    #[test]
    fn test_unsupported_gate_propagates() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit
            .apply(Instruction::two_qubit_gate(StandardGate::ISwap, QubitId(0), QubitId(1)))
            .unwrap();
        let result = circuit_to_hiq(&circuit);
        assert!(matches!(result, Err(InteropError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_u_gate_expands() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.u(0.1, 0.2, 0.3, QubitId(0)).unwrap();
        let hiq = circuit_to_hiq(&circuit).unwrap();
        assert_eq!(hiq.n_gates(), 3);
    }

    #[test]
    fn test_routed_circuit_converts() {
        use crate::architecture::Architecture;
        use crate::routing::place_and_route;

        let mut hiq = HiqCircuit::new("routed");
        hiq.add_qubits(3);
        hiq.push(Op::CX, vec![UnitId::qubit(0), UnitId::qubit(2)]).unwrap();
        let arch = Architecture::new(3, vec![(0, 1), (1, 2)]);
        let (routed, _) = place_and_route(&hiq, &arch).unwrap();

        let circuit = hiq_to_circuit(&routed).unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.dag().num_ops(), 2);
    }

    #[test]
    fn test_box_round_trip() {
        let mut inner = HiqCircuit::new("pair");
        inner.add_qubits(2);
        inner.push(Op::H, vec![UnitId::qubit(0)]).unwrap();
        inner
            .push(Op::CX, vec![UnitId::qubit(0), UnitId::qubit(1)])
            .unwrap();

        let mut hiq = HiqCircuit::new("outer");
        hiq.add_qubits(2);
        hiq.push(
            Op::CircBox(Box::new(inner)),
            vec![UnitId::qubit(0), UnitId::qubit(1)],
        )
        .unwrap();

        let circuit = hiq_to_circuit(&hiq).unwrap();
        let insts = circuit.dag().instructions();
        assert_eq!(insts.len(), 1);
        assert!(matches!(
            insts[0].kind,
            InstructionKind::Gate(Gate::Composite(_))
        ));
    }
}
