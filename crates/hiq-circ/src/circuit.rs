//! Command-list circuit.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CircError, CircResult};
use crate::op::Op;
use crate::unit::UnitId;

/// A single operation with its arguments.
///
/// For [`Op::Measure`] the arguments are `[qubit, bit]`; for every
/// other op they are qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// The operation.
    pub op: Op,
    /// Argument units.
    pub args: Vec<UnitId>,
}

/// A quantum circuit as a flat list of commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiqCircuit {
    name: String,
    qubits: Vec<UnitId>,
    bits: Vec<UnitId>,
    commands: Vec<Command>,
}

impl HiqCircuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            bits: vec![],
            commands: vec![],
        }
    }

    /// Append `n` qubits in the default `q` register.
    pub fn add_qubits(&mut self, n: u32) {
        let start = u32::try_from(self.qubits.len()).unwrap_or(u32::MAX);
        for i in 0..n {
            self.qubits.push(UnitId::qubit(start + i));
        }
    }

    /// Append `n` bits in the default `c` register.
    pub fn add_bits(&mut self, n: u32) {
        let start = u32::try_from(self.bits.len()).unwrap_or(u32::MAX);
        for i in 0..n {
            self.bits.push(UnitId::bit(start + i));
        }
    }

    /// Append a qubit with an explicit unit id.
    pub fn add_qubit_unit(&mut self, unit: UnitId) {
        if !self.qubits.contains(&unit) {
            self.qubits.push(unit);
        }
    }

    /// Append a bit with an explicit unit id.
    pub fn add_bit_unit(&mut self, unit: UnitId) {
        if !self.bits.contains(&unit) {
            self.bits.push(unit);
        }
    }

    /// Append a command, validating arity and unit membership.
    pub fn push(&mut self, op: Op, args: Vec<UnitId>) -> CircResult<()> {
        match &op {
            Op::Measure => {
                if args.len() != 2 {
                    return Err(CircError::ArityMismatch {
                        op: op.name().to_string(),
                        expected: 2,
                        got: args.len(),
                    });
                }
                if !self.qubits.contains(&args[0]) {
                    return Err(CircError::UnknownUnit(args[0].clone()));
                }
                if !self.bits.contains(&args[1]) {
                    return Err(CircError::UnknownUnit(args[1].clone()));
                }
            }
            Op::Barrier => {
                for arg in &args {
                    if !self.qubits.contains(arg) {
                        return Err(CircError::UnknownUnit(arg.clone()));
                    }
                }
            }
            Op::CircBox(inner) => {
                if args.len() != inner.n_qubits() {
                    return Err(CircError::ArityMismatch {
                        op: op.name().to_string(),
                        expected: inner.n_qubits(),
                        got: args.len(),
                    });
                }
                for arg in &args {
                    if !self.qubits.contains(arg) {
                        return Err(CircError::UnknownUnit(arg.clone()));
                    }
                }
            }
            other => {
                let expected = other.n_qubits().unwrap_or(args.len());
                if args.len() != expected {
                    return Err(CircError::ArityMismatch {
                        op: other.name().to_string(),
                        expected,
                        got: args.len(),
                    });
                }
                for arg in &args {
                    if !self.qubits.contains(arg) {
                        return Err(CircError::UnknownUnit(arg.clone()));
                    }
                }
            }
        }

        let mut seen = Vec::with_capacity(args.len());
        for arg in &args {
            if seen.contains(&arg) {
                return Err(CircError::DuplicateArg(arg.clone()));
            }
            seen.push(arg);
        }

        self.commands.push(Command { op, args });
        Ok(())
    }

    /// Replace the command list wholesale (used by passes).
    pub fn set_commands(&mut self, commands: Vec<Command>) {
        self.commands = commands;
    }

    /// Replace the qubit list wholesale (used by routing).
    pub fn set_qubits(&mut self, qubits: Vec<UnitId>) {
        self.qubits = qubits;
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared qubits in order.
    pub fn qubits(&self) -> &[UnitId] {
        &self.qubits
    }

    /// Declared bits in order.
    pub fn bits(&self) -> &[UnitId] {
        &self.bits
    }

    /// Commands in program order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of qubits.
    pub fn n_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Number of bits.
    pub fn n_bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of unitary gates.
    pub fn n_gates(&self) -> usize {
        self.commands.iter().filter(|c| c.op.is_gate()).count()
    }

    /// Longest per-unit dependency chain. Barriers synchronize their
    /// arguments without contributing depth.
    pub fn depth(&self) -> usize {
        let mut unit_depth: FxHashMap<&UnitId, usize> = FxHashMap::default();
        let mut max_depth = 0;

        for command in &self.commands {
            let front = command
                .args
                .iter()
                .map(|u| unit_depth.get(u).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            let depth = if matches!(command.op, Op::Barrier) { front } else { front + 1 };
            for unit in &command.args {
                unit_depth.insert(unit, depth);
            }
            max_depth = max_depth.max(depth);
        }
        max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell() -> HiqCircuit {
        let mut circuit = HiqCircuit::new("bell");
        circuit.add_qubits(2);
        circuit.add_bits(2);
        circuit.push(Op::H, vec![UnitId::qubit(0)]).unwrap();
        circuit
            .push(Op::CX, vec![UnitId::qubit(0), UnitId::qubit(1)])
            .unwrap();
        circuit
            .push(Op::Measure, vec![UnitId::qubit(0), UnitId::bit(0)])
            .unwrap();
        circuit
            .push(Op::Measure, vec![UnitId::qubit(1), UnitId::bit(1)])
            .unwrap();
        circuit
    }

    #[test]
    fn test_counts() {
        let circuit = bell();
        assert_eq!(circuit.n_qubits(), 2);
        assert_eq!(circuit.n_bits(), 2);
        assert_eq!(circuit.n_gates(), 2);
        assert_eq!(circuit.commands().len(), 4);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let mut circuit = HiqCircuit::new("test");
        circuit.add_qubits(1);
        let err = circuit.push(Op::H, vec![UnitId::qubit(5)]).unwrap_err();
        assert!(matches!(err, CircError::UnknownUnit(_)));
    }

    #[test]
    fn test_arity_checked() {
        let mut circuit = HiqCircuit::new("test");
        circuit.add_qubits(2);
        let err = circuit.push(Op::CX, vec![UnitId::qubit(0)]).unwrap_err();
        assert!(matches!(err, CircError::ArityMismatch { .. }));
    }

    #[test]
    fn test_duplicate_arg_rejected() {
        let mut circuit = HiqCircuit::new("test");
        circuit.add_qubits(1);
        let err = circuit
            .push(Op::CX, vec![UnitId::qubit(0), UnitId::qubit(0)])
            .unwrap_err();
        assert!(matches!(err, CircError::DuplicateArg(_)));
    }

    #[test]
    fn test_circ_box() {
        let mut inner = HiqCircuit::new("inner");
        inner.add_qubits(1);
        inner.push(Op::X, vec![UnitId::qubit(0)]).unwrap();

        let mut circuit = HiqCircuit::new("outer");
        circuit.add_qubits(2);
        circuit
            .push(Op::CircBox(Box::new(inner)), vec![UnitId::qubit(1)])
            .unwrap();

        assert_eq!(circuit.n_gates(), 1);
    }

    #[test]
    fn test_barrier_depth() {
        let mut circuit = HiqCircuit::new("test");
        circuit.add_qubits(2);
        circuit.push(Op::H, vec![UnitId::qubit(0)]).unwrap();
        circuit
            .push(Op::Barrier, vec![UnitId::qubit(0), UnitId::qubit(1)])
            .unwrap();
        circuit.push(Op::X, vec![UnitId::qubit(1)]).unwrap();

        assert_eq!(circuit.depth(), 2);
    }
}
