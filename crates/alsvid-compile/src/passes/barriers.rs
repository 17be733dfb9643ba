//! Barrier removal.

use alsvid_ir::CircuitDag;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::property::PropertySet;

/// Strip every barrier from the circuit.
///
/// Runs at the highest optimization level so that cancellation and
/// resynthesis can work across former synchronization points.
pub struct RemoveBarriers;

impl Pass for RemoveBarriers {
    fn name(&self) -> &'static str {
        "RemoveBarriers"
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let instructions = dag.instructions();
        let mut rebuilt = dag.empty_like();
        for inst in instructions {
            if !inst.is_barrier() {
                rebuilt.push(inst)?;
            }
        }
        *dag = rebuilt;
        Ok(())
    }
}
