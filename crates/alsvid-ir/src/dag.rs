//! DAG-based circuit representation.
//!
//! Every node is an operation; wire dependencies are edges labeled with
//! the wire they run along. Each wire keeps a front pointer to its most
//! recent operation, so [`CircuitDag::push`] links new operations in
//! O(1) per operand. Passes that reorder or drop operations rebuild a
//! fresh DAG via [`CircuitDag::empty_like`] instead of splicing nodes
//! in place.

use petgraph::Direction;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Re-exported node index type.
pub type NodeIndex = petgraph::graph::NodeIndex<u32>;

/// Identifier for a wire (quantum or classical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

/// A quantum circuit as a dependency DAG of operations.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    /// The underlying graph; node weights are instructions.
    graph: DiGraph<Instruction, WireId, u32>,
    /// Qubits in declaration order.
    qubits: Vec<QubitId>,
    /// Classical bits in declaration order.
    clbits: Vec<ClbitId>,
    /// Most recent operation on each wire.
    front: FxHashMap<WireId, NodeIndex>,
    /// Global phase of the circuit.
    global_phase: f64,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty DAG with the same qubits and classical bits.
    pub fn empty_like(&self) -> Self {
        Self {
            graph: DiGraph::default(),
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            front: FxHashMap::default(),
            global_phase: self.global_phase,
        }
    }

    /// Add a qubit wire.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if !self.qubits.contains(&qubit) {
            self.qubits.push(qubit);
        }
    }

    /// Add a classical wire.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if !self.clbits.contains(&clbit) {
            self.clbits.push(clbit);
        }
    }

    /// Append an instruction at the end of its wires.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits();
            let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.qubits.contains(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    op: instruction.name().to_string(),
                });
            }
        }
        for &clbit in &instruction.clbits {
            if !self.clbits.contains(&clbit) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    op: instruction.name().to_string(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    op: instruction.name().to_string(),
                });
            }
        }

        let wires: Vec<WireId> = instruction
            .qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(instruction.clbits.iter().map(|&c| WireId::Clbit(c)))
            .collect();

        let node = self.graph.add_node(instruction);
        for wire in wires {
            if let Some(&prev) = self.front.get(&wire) {
                self.graph.add_edge(prev, node, wire);
            }
            self.front.insert(wire, node);
        }
        Ok(node)
    }

    /// Iterate over operations in topological order.
    ///
    /// Node insertion order is a valid topological order here because
    /// [`push`](Self::push) only appends at wire fronts, but the sort is
    /// kept explicit so rebuilt or merged graphs stay correct.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        petgraph::algo::toposort(&self.graph, None)
            .expect("circuit DAG must be acyclic")
            .into_iter()
            .map(|idx| (idx, &self.graph[idx]))
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Clone the instructions in topological order.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.topological_ops().map(|(_, inst)| inst.clone()).collect()
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node)
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph.node_count()
    }

    /// Iterate over the qubits in declaration order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }

    /// Iterate over the classical bits in declaration order.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.clbits.iter().copied()
    }

    /// Longest dependency chain of scheduled operations.
    ///
    /// Barriers synchronize but are directives, not scheduled
    /// operations; they propagate depth without adding to it.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0usize;

        for node in
            petgraph::algo::toposort(&self.graph, None).expect("circuit DAG must be acyclic")
        {
            let pred = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            let own = if self.graph[node].is_barrier() { pred } else { pred + 1 };
            max_depth = max_depth.max(own);
            depths.insert(node, own);
        }

        max_depth
    }

    /// Get the global phase.
    #[inline]
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Set the global phase.
    pub fn set_global_phase(&mut self, phase: f64) {
        self.global_phase = phase;
    }
}
