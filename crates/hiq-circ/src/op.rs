//! Operation types for HIQ circuits.

use serde::{Deserialize, Serialize};

use crate::circuit::HiqCircuit;

/// An operation in a HIQ circuit.
///
/// Gate vocabulary intentionally differs from the alsvid IR: `V` is
/// the X square root, `U1` the phase gate, `ZZPhase` the ZZ rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// S gate.
    S,
    /// S-dagger.
    Sdg,
    /// T gate.
    T,
    /// T-dagger.
    Tdg,
    /// X square root.
    V,
    /// Inverse X square root.
    Vdg,
    /// X rotation.
    Rx(f64),
    /// Y rotation.
    Ry(f64),
    /// Z rotation.
    Rz(f64),
    /// Phase gate.
    U1(f64),
    /// Controlled-X.
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled-Hadamard.
    CH,
    /// Swap.
    Swap,
    /// Controlled Z rotation.
    CRz(f64),
    /// Controlled phase.
    CU1(f64),
    /// ZZ interaction.
    ZZPhase(f64),
    /// Toffoli.
    CCX,
    /// Controlled swap.
    CSwap,
    /// Measurement (qubit arg, bit arg).
    Measure,
    /// Reset to |0>.
    Reset,
    /// Barrier over its arguments.
    Barrier,
    /// A nested circuit applied as one operation.
    CircBox(Box<HiqCircuit>),
}

impl Op {
    /// Canonical operation name.
    pub fn name(&self) -> &'static str {
        match self {
            Op::H => "H",
            Op::X => "X",
            Op::Y => "Y",
            Op::Z => "Z",
            Op::S => "S",
            Op::Sdg => "Sdg",
            Op::T => "T",
            Op::Tdg => "Tdg",
            Op::V => "V",
            Op::Vdg => "Vdg",
            Op::Rx(_) => "Rx",
            Op::Ry(_) => "Ry",
            Op::Rz(_) => "Rz",
            Op::U1(_) => "U1",
            Op::CX => "CX",
            Op::CY => "CY",
            Op::CZ => "CZ",
            Op::CH => "CH",
            Op::Swap => "SWAP",
            Op::CRz(_) => "CRz",
            Op::CU1(_) => "CU1",
            Op::ZZPhase(_) => "ZZPhase",
            Op::CCX => "CCX",
            Op::CSwap => "CSWAP",
            Op::Measure => "Measure",
            Op::Reset => "Reset",
            Op::Barrier => "Barrier",
            Op::CircBox(_) => "CircBox",
        }
    }

    /// Number of qubit arguments. Barriers are variadic and boxes take
    /// their inner circuit's qubit count; both return `None`.
    pub fn n_qubits(&self) -> Option<usize> {
        match self {
            Op::H
            | Op::X
            | Op::Y
            | Op::Z
            | Op::S
            | Op::Sdg
            | Op::T
            | Op::Tdg
            | Op::V
            | Op::Vdg
            | Op::Rx(_)
            | Op::Ry(_)
            | Op::Rz(_)
            | Op::U1(_)
            | Op::Measure
            | Op::Reset => Some(1),
            Op::CX
            | Op::CY
            | Op::CZ
            | Op::CH
            | Op::Swap
            | Op::CRz(_)
            | Op::CU1(_)
            | Op::ZZPhase(_) => Some(2),
            Op::CCX | Op::CSwap => Some(3),
            Op::Barrier | Op::CircBox(_) => None,
        }
    }

    /// Whether this op is a unitary gate (counted in gate statistics).
    pub fn is_gate(&self) -> bool {
        !matches!(self, Op::Measure | Op::Reset | Op::Barrier)
    }

    /// Whether this op is its own inverse.
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            Op::H
                | Op::X
                | Op::Y
                | Op::Z
                | Op::CX
                | Op::CY
                | Op::CZ
                | Op::CH
                | Op::Swap
                | Op::CCX
                | Op::CSwap
        )
    }

    /// Whether `self` followed by `other` multiplies to the identity.
    pub fn cancels_with(&self, other: &Op) -> bool {
        if self.is_self_inverse() {
            return self == other;
        }
        matches!(
            (self, other),
            (Op::S, Op::Sdg)
                | (Op::Sdg, Op::S)
                | (Op::T, Op::Tdg)
                | (Op::Tdg, Op::T)
                | (Op::V, Op::Vdg)
                | (Op::Vdg, Op::V)
        )
    }

    /// Merge two same-kind rotations into one, when possible.
    pub fn merged(&self, other: &Op) -> Option<Op> {
        let op = match (self, other) {
            (Op::Rx(a), Op::Rx(b)) => Op::Rx(a + b),
            (Op::Ry(a), Op::Ry(b)) => Op::Ry(a + b),
            (Op::Rz(a), Op::Rz(b)) => Op::Rz(a + b),
            (Op::U1(a), Op::U1(b)) => Op::U1(a + b),
            (Op::CRz(a), Op::CRz(b)) => Op::CRz(a + b),
            (Op::CU1(a), Op::CU1(b)) => Op::CU1(a + b),
            (Op::ZZPhase(a), Op::ZZPhase(b)) => Op::ZZPhase(a + b),
            _ => return None,
        };
        Some(op)
    }

    /// Rotation angle of a parameterized op.
    pub fn angle(&self) -> Option<f64> {
        match self {
            Op::Rx(a)
            | Op::Ry(a)
            | Op::Rz(a)
            | Op::U1(a)
            | Op::CRz(a)
            | Op::CU1(a)
            | Op::ZZPhase(a) => Some(*a),
            _ => None,
        }
    }

    /// Whether the op is diagonal in the computational basis.
    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            Op::Z
                | Op::S
                | Op::Sdg
                | Op::T
                | Op::Tdg
                | Op::Rz(_)
                | Op::U1(_)
                | Op::CZ
                | Op::CRz(_)
                | Op::CU1(_)
                | Op::ZZPhase(_)
        )
    }

    /// Whether the op is symmetric in its qubit arguments.
    pub fn is_symmetric(&self) -> bool {
        matches!(self, Op::CZ | Op::Swap | Op::ZZPhase(_) | Op::CU1(_))
    }
}
