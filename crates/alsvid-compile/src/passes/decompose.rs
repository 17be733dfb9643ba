//! Composite gate decomposition.

use alsvid_ir::{CircuitDag, Gate, Instruction, InstructionKind, QubitId};

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::property::PropertySet;

/// Inline every composite gate into its defining body.
///
/// Runs at every optimization level so downstream passes only see
/// standard gates.
pub struct DecomposeComposites;

fn inline(instruction: &Instruction, out: &mut Vec<Instruction>) {
    match &instruction.kind {
        InstructionKind::Gate(Gate::Composite(composite)) => {
            for body_inst in &composite.body {
                let mapped = body_inst
                    .remapped(|local| instruction.qubits[local.0 as usize]);
                inline(&mapped, out);
            }
        }
        _ => out.push(instruction.clone()),
    }
}

impl Pass for DecomposeComposites {
    fn name(&self) -> &'static str {
        "DecomposeComposites"
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let instructions = dag.instructions();
        let mut rebuilt = dag.empty_like();
        let mut flat = Vec::with_capacity(instructions.len());
        for inst in &instructions {
            inline(inst, &mut flat);
        }
        for inst in flat {
            rebuilt.push(inst)?;
        }
        *dag = rebuilt;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::{Circuit, CompositeGate, StandardGate};

    #[test]
    fn test_decompose_inlines_body() {
        let body = vec![
            Instruction::single_qubit_gate(StandardGate::H, QubitId(0)),
            Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)),
        ];
        let boxed = CompositeGate::new("bell_pair", 2, body);

        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.gate(boxed, [QubitId(1), QubitId(2)]).unwrap();
        let mut dag = circuit.into_dag();

        DecomposeComposites.run(&mut dag, &mut PropertySet::new()).unwrap();

        let insts = dag.instructions();
        assert_eq!(insts.len(), 2);
        assert_eq!(insts[0].name(), "h");
        assert_eq!(insts[0].qubits, vec![QubitId(1)]);
        assert_eq!(insts[1].name(), "cx");
        assert_eq!(insts[1].qubits, vec![QubitId(1), QubitId(2)]);
    }

    #[test]
    fn test_nested_composites() {
        let inner = CompositeGate::new(
            "inner",
            1,
            vec![Instruction::single_qubit_gate(StandardGate::X, QubitId(0))],
        );
        let outer = CompositeGate::new("outer", 1, vec![Instruction::gate(inner, [QubitId(0)])]);

        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.gate(outer, [QubitId(0)]).unwrap();
        let mut dag = circuit.into_dag();

        DecomposeComposites.run(&mut dag, &mut PropertySet::new()).unwrap();

        let insts = dag.instructions();
        assert_eq!(insts.len(), 1);
        assert_eq!(insts[0].name(), "x");
    }
}
