//! Virtual-to-physical mapping derivation per backend.

use rustc_hash::FxHashMap;

use alsvid_compile::Layout;
use alsvid_ir::{Circuit, QubitId};
use hiq_circ::{HiqCircuit, UnitId};

use super::VirtualPhysicalMapping;
use crate::error::AlsvidError;

/// Derive mappings for native DAG circuits.
pub struct AlsvidLayoutMapper;

impl AlsvidLayoutMapper {
    /// Mapping from the compilation layout; identity when no placement
    /// ran.
    pub fn mapping_from_layout(
        circuit: &Circuit,
        layout: Option<&Layout>,
    ) -> VirtualPhysicalMapping {
        let Some(layout) = layout else {
            return VirtualPhysicalMapping::identity(circuit.num_qubits(), circuit.num_clbits());
        };

        let qubit_mapping = (0..circuit.num_qubits())
            .map(|i| {
                let virtual_id = QubitId(u32::try_from(i).unwrap_or(u32::MAX));
                let physical = layout.get_physical(virtual_id).map_or(i, |p| p as usize);
                (i, physical)
            })
            .collect();

        VirtualPhysicalMapping {
            qubit_mapping,
            bit_mapping: (0..circuit.num_clbits()).map(|i| (i, i)).collect(),
        }
    }
}

/// Derive mappings for HIQ circuits from a routing `final_map`.
pub struct HiqLayoutMapper;

impl HiqLayoutMapper {
    /// Identity mapping over a circuit's own unit counts.
    pub fn identity(circuit: &HiqCircuit) -> VirtualPhysicalMapping {
        VirtualPhysicalMapping::identity(circuit.n_qubits(), circuit.n_bits())
    }

    /// Mapping derived from the routing result.
    ///
    /// Each original qubit unit is looked up in the final map and its
    /// physical unit normalized to an integer index: the leading index
    /// element when present, else the unit's position in the routed
    /// circuit's qubit list. Units that resolve neither way fail
    /// rather than mapping to a wrong index.
    pub fn mapping_from_final_map(
        original: &HiqCircuit,
        routed: &HiqCircuit,
        final_map: &FxHashMap<UnitId, UnitId>,
    ) -> Result<VirtualPhysicalMapping, AlsvidError> {
        let mut qubit_mapping = FxHashMap::default();
        for (virtual_index, unit) in original.qubits().iter().enumerate() {
            let physical_unit = final_map.get(unit).unwrap_or(unit);
            let physical_index = Self::unit_index(physical_unit, routed)?;
            qubit_mapping.insert(virtual_index, physical_index);
        }

        Ok(VirtualPhysicalMapping {
            qubit_mapping,
            bit_mapping: (0..original.n_bits()).map(|i| (i, i)).collect(),
        })
    }

    /// Normalize a unit handle to an integer index.
    fn unit_index(unit: &UnitId, circuit: &HiqCircuit) -> Result<usize, AlsvidError> {
        if let Some(index) = unit.first_index() {
            return Ok(index as usize);
        }
        circuit
            .qubits()
            .iter()
            .position(|candidate| candidate == unit)
            .ok_or_else(|| AlsvidError::UnitResolution {
                unit: unit.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_compile::Layout as CompileLayout;

    #[test]
    fn test_alsvid_identity_without_layout() {
        let circuit = Circuit::bell().unwrap();
        let mapping = AlsvidLayoutMapper::mapping_from_layout(&circuit, None);
        assert_eq!(mapping.qubit_mapping[&0], 0);
        assert_eq!(mapping.qubit_mapping[&1], 1);
        assert_eq!(mapping.bit_mapping.len(), 2);
    }

    #[test]
    fn test_alsvid_layout_mapping() {
        let circuit = Circuit::bell().unwrap();
        let mut layout = CompileLayout::trivial(2);
        layout.swap(0, 1);

        let mapping = AlsvidLayoutMapper::mapping_from_layout(&circuit, Some(&layout));
        assert_eq!(mapping.qubit_mapping[&0], 1);
        assert_eq!(mapping.qubit_mapping[&1], 0);
    }

    #[test]
    fn test_hiq_final_map() {
        let mut original = HiqCircuit::new("test");
        original.add_qubits(2);

        let mut routed = HiqCircuit::new("test");
        routed.set_qubits(vec![UnitId::node(0), UnitId::node(1)]);

        let mut final_map = FxHashMap::default();
        final_map.insert(UnitId::qubit(0), UnitId::node(1));
        final_map.insert(UnitId::qubit(1), UnitId::node(0));

        let mapping =
            HiqLayoutMapper::mapping_from_final_map(&original, &routed, &final_map).unwrap();
        assert_eq!(mapping.qubit_mapping[&0], 1);
        assert_eq!(mapping.qubit_mapping[&1], 0);
    }

    #[test]
    fn test_hiq_positional_fallback() {
        let mut original = HiqCircuit::new("test");
        original.add_qubits(1);

        // A physical handle with an empty index sequence resolves by
        // position in the routed qubit list.
        let scalar = UnitId::new("anc", vec![]);
        let mut routed = HiqCircuit::new("test");
        routed.set_qubits(vec![UnitId::node(0), scalar.clone()]);

        let mut final_map = FxHashMap::default();
        final_map.insert(UnitId::qubit(0), scalar);

        let mapping =
            HiqLayoutMapper::mapping_from_final_map(&original, &routed, &final_map).unwrap();
        assert_eq!(mapping.qubit_mapping[&0], 1);
    }

    #[test]
    fn test_hiq_unresolvable_unit_fails() {
        let mut original = HiqCircuit::new("test");
        original.add_qubits(1);

        let routed = HiqCircuit::new("test");
        let mut final_map = FxHashMap::default();
        final_map.insert(UnitId::qubit(0), UnitId::new("ghost", vec![]));

        let result = HiqLayoutMapper::mapping_from_final_map(&original, &routed, &final_map);
        assert!(matches!(result, Err(AlsvidError::UnitResolution { .. })));
    }
}
