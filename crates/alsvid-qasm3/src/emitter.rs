//! QASM emission from IR circuits.

use std::fmt::Write;

use alsvid_ir::{Circuit, Gate, Instruction, InstructionKind, StandardGate};

use crate::error::EmitError;

/// Emit a circuit as `OpenQASM` 3.0 source.
///
/// Qubits and bits are flattened into single `q`/`c` registers in id
/// order; original register names are not preserved. Composite gates
/// and delays have no textual form and must be decomposed away before
/// emission.
pub fn emit(circuit: &Circuit) -> Result<String, EmitError> {
    let mut out = String::new();
    out.push_str("OPENQASM 3.0;\n");
    out.push_str("include \"stdgates.inc\";\n");
    if circuit.num_qubits() > 0 {
        let _ = writeln!(out, "qubit[{}] q;", circuit.num_qubits());
    }
    if circuit.num_clbits() > 0 {
        let _ = writeln!(out, "bit[{}] c;", circuit.num_clbits());
    }

    for instruction in circuit.dag().instructions() {
        emit_instruction(&mut out, &instruction, Dialect::V3)?;
    }
    Ok(out)
}

/// Emit a circuit as legacy `OpenQASM` 2.0 source.
pub fn emit_qasm2(circuit: &Circuit) -> Result<String, EmitError> {
    let mut out = String::new();
    out.push_str("OPENQASM 2.0;\n");
    out.push_str("include \"qelib1.inc\";\n");
    if circuit.num_qubits() > 0 {
        let _ = writeln!(out, "qreg q[{}];", circuit.num_qubits());
    }
    if circuit.num_clbits() > 0 {
        let _ = writeln!(out, "creg c[{}];", circuit.num_clbits());
    }

    for instruction in circuit.dag().instructions() {
        emit_instruction(&mut out, &instruction, Dialect::V2)?;
    }
    Ok(out)
}

#[derive(Clone, Copy, PartialEq)]
enum Dialect {
    V2,
    V3,
}

fn emit_instruction(
    out: &mut String,
    instruction: &Instruction,
    dialect: Dialect,
) -> Result<(), EmitError> {
    match &instruction.kind {
        InstructionKind::Gate(Gate::Standard(gate)) => {
            let name = gate_name(gate, dialect);
            let params = gate_params(gate);
            if params.is_empty() {
                let _ = write!(out, "{name} ");
            } else {
                let rendered: Vec<String> = params.iter().map(ToString::to_string).collect();
                let _ = write!(out, "{name}({}) ", rendered.join(", "));
            }
            let operands: Vec<String> =
                instruction.qubits.iter().map(|q| format!("q[{}]", q.0)).collect();
            let _ = writeln!(out, "{};", operands.join(", "));
            Ok(())
        }
        InstructionKind::Gate(Gate::Composite(composite)) => {
            Err(EmitError::Unsupported(composite.name.clone()))
        }
        InstructionKind::Measure => {
            let qubit = instruction.qubits[0].0;
            let clbit = instruction.clbits[0].0;
            match dialect {
                Dialect::V3 => {
                    let _ = writeln!(out, "c[{clbit}] = measure q[{qubit}];");
                }
                Dialect::V2 => {
                    let _ = writeln!(out, "measure q[{qubit}] -> c[{clbit}];");
                }
            }
            Ok(())
        }
        InstructionKind::Reset => {
            let _ = writeln!(out, "reset q[{}];", instruction.qubits[0].0);
            Ok(())
        }
        InstructionKind::Barrier => {
            let operands: Vec<String> =
                instruction.qubits.iter().map(|q| format!("q[{}]", q.0)).collect();
            let _ = writeln!(out, "barrier {};", operands.join(", "));
            Ok(())
        }
        InstructionKind::Delay { .. } => Err(EmitError::Unsupported("delay".to_string())),
    }
}

fn gate_name(gate: &StandardGate, dialect: Dialect) -> &'static str {
    if dialect == Dialect::V2 {
        match gate {
            StandardGate::P(_) => return "u1",
            StandardGate::U(_, _, _) => return "u3",
            StandardGate::CP(_) => return "cu1",
            _ => {}
        }
    }
    gate.name()
}

fn gate_params(gate: &StandardGate) -> Vec<f64> {
    match gate {
        StandardGate::Rx(t)
        | StandardGate::Ry(t)
        | StandardGate::Rz(t)
        | StandardGate::P(t)
        | StandardGate::CRx(t)
        | StandardGate::CRy(t)
        | StandardGate::CRz(t)
        | StandardGate::CP(t)
        | StandardGate::RZZ(t) => vec![*t],
        StandardGate::U(t, p, l) => vec![*t, *p, *l],
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use alsvid_ir::QubitId;

    #[test]
    fn test_emit_bell() {
        let circuit = Circuit::bell().unwrap();
        let qasm = emit(&circuit).unwrap();

        assert!(qasm.contains("OPENQASM 3.0;"));
        assert!(qasm.contains("qubit[2] q;"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("c[0] = measure q[0];"));
    }

    #[test]
    fn test_emit_qasm2_bell() {
        let circuit = Circuit::bell().unwrap();
        let qasm = emit_qasm2(&circuit).unwrap();

        assert!(qasm.contains("OPENQASM 2.0;"));
        assert!(qasm.contains("qreg q[2];"));
        assert!(qasm.contains("measure q[0] -> c[0];"));
    }

    #[test]
    fn test_emit_parameterized() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.rz(0.5, QubitId(0)).unwrap();
        let qasm = emit(&circuit).unwrap();
        assert!(qasm.contains("rz(0.5) q[0];"));
    }

    #[test]
    fn test_emit_parse_round_trip() {
        let circuit = Circuit::ghz(4).unwrap();
        let qasm = emit(&circuit).unwrap();
        let reparsed = parse(&qasm).unwrap();

        assert_eq!(reparsed.num_qubits(), circuit.num_qubits());
        assert_eq!(reparsed.num_clbits(), circuit.num_clbits());
        assert_eq!(reparsed.dag().num_ops(), circuit.dag().num_ops());
        assert_eq!(reparsed.depth(), circuit.depth());
    }

    #[test]
    fn test_delay_unsupported() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.delay(QubitId(0), 100).unwrap();
        assert!(matches!(emit(&circuit), Err(EmitError::Unsupported(_))));
    }
}
