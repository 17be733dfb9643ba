//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use alsvid_ir::CircuitDag;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{
    CancelInverses, CliffordSimp, DecomposeComposites, MergeRotations, Optimize1qRuns, Rebase,
    RemoveBarriers, SwapRouting, TrivialLayout,
};
use crate::property::{GateSet, PropertySet};
use crate::target::Target;

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given DAG.
    #[instrument(skip(self, dag, properties))]
    pub fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            dag.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(dag, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(dag, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), dag.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!("Pass manager completed, ops: {}", dag.num_ops());
        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers with preset configurations.
pub struct PassManagerBuilder {
    /// Optimization level (0-3).
    optimization_level: u8,
    /// Target properties.
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            optimization_level: 1,
            properties: PropertySet::new(),
        }
    }

    /// Set the optimization level.
    ///
    /// - Level 0: structural normalization only (decompose + rebase)
    /// - Level 1: + inverse cancellation, rotation merging (default)
    /// - Level 2: + single-qubit run resynthesis, Clifford cleanup
    /// - Level 3: + barrier removal, extended rebase target
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(3);
        self
    }

    /// Set the target properties directly.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Set the target coupling map and gate set.
    #[must_use]
    pub fn with_target(
        mut self,
        coupling_map: crate::property::CouplingMap,
        gate_set: GateSet,
    ) -> Self {
        self.properties.coupling_map = Some(coupling_map);
        self.properties.gate_set = Some(gate_set);
        self
    }

    /// Configure from a device target.
    ///
    /// A target without a coupling map is treated as fully connected:
    /// no layout or routing passes are scheduled, only the rebase into
    /// its gate set.
    #[must_use]
    pub fn with_device(mut self, target: &Target) -> Self {
        self.properties.coupling_map = target.coupling().cloned();
        self.properties.gate_set = target.gate_set().cloned();
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();
        let level = self.optimization_level;

        pm.add_pass(DecomposeComposites);

        if level >= 3 {
            pm.add_pass(RemoveBarriers);
        }
        if level >= 1 {
            pm.add_pass(CancelInverses);
            pm.add_pass(MergeRotations);
        }
        if level >= 2 {
            pm.add_pass(Optimize1qRuns);
            pm.add_pass(CliffordSimp);
            pm.add_pass(CancelInverses);
        }

        // Placement and routing run before the final rebase so routing
        // SWAPs are themselves rebased into the target set.
        if self.properties.coupling_map.is_some() {
            pm.add_pass(TrivialLayout);
            pm.add_pass(SwapRouting);
        }

        let fallback = if level >= 3 { GateSet::extended() } else { GateSet::standard() };
        pm.add_pass(Rebase::new(fallback));

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::CouplingMap;
    use alsvid_ir::{Circuit, QubitId};

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_level_1_cancels_redundant_gates() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();

        let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(1).build();
        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_level_0_keeps_redundant_gates() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();

        let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(0).build();
        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        assert_eq!(dag.num_ops(), 2);
    }

    #[test]
    fn test_level_3_removes_barriers() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier([QubitId(0)]).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(3).build();
        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_device_pipeline_routes_and_rebases() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.cx(QubitId(0), QubitId(2)).unwrap();

        let target = Target::new("line3", 3)
            .with_gate_set(GateSet::standard())
            .with_coupling(CouplingMap::linear(3));

        let (pm, mut props) = PassManagerBuilder::new()
            .with_optimization_level(2)
            .with_device(&target)
            .build();
        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        assert!(props.layout.is_some());
        assert!(dag.num_ops() >= 2);
    }

    #[test]
    fn test_builder_clamps_level() {
        let builder = PassManagerBuilder::new().with_optimization_level(9);
        let (pm, _) = builder.build();
        assert!(!pm.is_empty());
    }
}
