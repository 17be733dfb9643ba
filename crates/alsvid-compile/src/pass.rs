//! Pass trait for compilation passes.

use alsvid_ir::CircuitDag;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// A compilation pass that operates on a circuit DAG.
///
/// Passes are the fundamental unit of compilation. Each pass performs
/// a specific transformation or analysis on the circuit, communicating
/// with other passes through the [`PropertySet`].
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Run the pass on the given DAG.
    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _dag: &CircuitDag, _properties: &PropertySet) -> bool {
        true
    }
}
