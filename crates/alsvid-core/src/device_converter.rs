//! Device converters and their registry.

use rustc_hash::FxHashMap;
use tracing::debug;

use alsvid_compile::{CouplingMap, GateSet, Target};
use hiq_circ::{Architecture, BackendInfo};

use crate::device::{Device, QdmiDevice};
use crate::error::AlsvidError;
use crate::lib_id::LibId;

/// A stateless conversion between two device representations.
pub trait DeviceConverter: Send + Sync {
    /// Convert a device into the target representation.
    fn convert(&self, device: &Device) -> Result<Device, AlsvidError>;
}

/// Identity converter synthesized for equal source/target pairs.
#[derive(Default)]
pub struct PassThroughDeviceConverter;

impl DeviceConverter for PassThroughDeviceConverter {
    fn convert(&self, device: &Device) -> Result<Device, AlsvidError> {
        Ok(device.clone())
    }
}

/// Registry of device converters keyed by (device lib, transpiler lib).
#[derive(Default)]
pub struct DeviceConverterRegistry {
    converters: FxHashMap<(LibId, LibId), Box<dyn DeviceConverter>>,
    pass_through: PassThroughDeviceConverter,
}

impl DeviceConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter for a (source, target) pair.
    pub fn register_converter(
        &mut self,
        source: LibId,
        target: LibId,
        converter: Box<dyn DeviceConverter>,
    ) -> Result<(), AlsvidError> {
        if self.converters.contains_key(&(source.clone(), target.clone())) {
            return Err(AlsvidError::DeviceConverterAlreadyRegistered { src: source, target });
        }
        debug!("Registering device converter {} -> {}", source, target);
        self.converters.insert((source, target), converter);
        Ok(())
    }

    /// Look up the converter for a pair; equal pairs pass through.
    pub fn get_converter(
        &self,
        source: &LibId,
        target: &LibId,
    ) -> Result<&dyn DeviceConverter, AlsvidError> {
        if source == target {
            return Ok(&self.pass_through);
        }
        self.converters
            .get(&(source.clone(), target.clone()))
            .map(AsRef::as_ref)
            .ok_or_else(|| AlsvidError::DeviceConverterNotFound {
                src: source.clone(),
                target: target.clone(),
            })
    }
}

fn expect_qdmi(device: &Device) -> Result<&QdmiDevice, AlsvidError> {
    match device {
        Device::Qdmi(d) => Ok(d),
        other => Err(AlsvidError::UnexpectedRepresentation {
            expected: "qdmi device",
            found: other.kind_name(),
        }),
    }
}

fn check_nonempty(device: &QdmiDevice) -> Result<(), AlsvidError> {
    if device.qubits.is_empty() {
        return Err(AlsvidError::InvalidDevice {
            name: device.name.clone(),
            reason: "device declares no qubits".to_string(),
        });
    }
    Ok(())
}

/// Abstract description -> native alsvid target.
///
/// Couplings become a coupling map; an empty coupling list leaves the
/// target fully connected. The abstract description never declares a
/// gate set, so the target carries none and the engine rebases to its
/// defaults.
pub struct QdmiToTargetConverter;

impl DeviceConverter for QdmiToTargetConverter {
    fn convert(&self, device: &Device) -> Result<Device, AlsvidError> {
        let qdmi = expect_qdmi(device)?;
        check_nonempty(qdmi)?;

        let mut target = Target::new(qdmi.name.clone(), qdmi.qubit_count());
        if !qdmi.couplings.is_empty() {
            let coupling = CouplingMap::from_edges(
                qdmi.qubit_count(),
                qdmi.couplings.iter().map(|c| (c.control, c.target)),
            );
            target = target.with_coupling(coupling);
        }
        Ok(Device::Target(target))
    }
}

/// Abstract description -> HIQ backend description.
pub struct QdmiToBackendInfoConverter;

impl DeviceConverter for QdmiToBackendInfoConverter {
    fn convert(&self, device: &Device) -> Result<Device, AlsvidError> {
        let qdmi = expect_qdmi(device)?;
        check_nonempty(qdmi)?;

        let mut info = BackendInfo::new(qdmi.name.clone(), qdmi.qubit_count());
        if !qdmi.couplings.is_empty() {
            let edges = qdmi.couplings.iter().map(|c| (c.control, c.target)).collect();
            info = info.with_architecture(Architecture::new(qdmi.qubit_count(), edges));
        }
        Ok(Device::Hiq(info))
    }
}

/// Map an alsvid gate name onto the HIQ vocabulary.
fn gate_name_to_hiq(name: &str) -> String {
    match name {
        "x" => "X",
        "y" => "Y",
        "z" => "Z",
        "h" => "H",
        "s" => "S",
        "sdg" => "Sdg",
        "t" => "T",
        "tdg" => "Tdg",
        "sx" => "V",
        "sxdg" => "Vdg",
        "rx" => "Rx",
        "ry" => "Ry",
        "rz" => "Rz",
        "p" => "U1",
        "cx" => "CX",
        "cy" => "CY",
        "cz" => "CZ",
        "ch" => "CH",
        "swap" => "SWAP",
        "crz" => "CRz",
        "cp" => "CU1",
        "rzz" => "ZZPhase",
        "ccx" => "CCX",
        "cswap" => "CSWAP",
        other => return other.to_string(),
    }
    .to_string()
}

/// Map a HIQ gate name onto the alsvid vocabulary.
fn gate_name_to_alsvid(name: &str) -> String {
    match name {
        "X" => "x",
        "Y" => "y",
        "Z" => "z",
        "H" => "h",
        "S" => "s",
        "Sdg" => "sdg",
        "T" => "t",
        "Tdg" => "tdg",
        "V" => "sx",
        "Vdg" => "sxdg",
        "Rx" => "rx",
        "Ry" => "ry",
        "Rz" => "rz",
        "U1" => "p",
        "CX" => "cx",
        "CY" => "cy",
        "CZ" => "cz",
        "CH" => "ch",
        "SWAP" => "swap",
        "CRz" => "crz",
        "CU1" => "cp",
        "ZZPhase" => "rzz",
        "CCX" => "ccx",
        "CSWAP" => "cswap",
        other => return other.to_string(),
    }
    .to_string()
}

/// Native alsvid target -> HIQ backend description.
pub struct TargetToBackendInfoConverter;

impl DeviceConverter for TargetToBackendInfoConverter {
    fn convert(&self, device: &Device) -> Result<Device, AlsvidError> {
        let target = device.expect_target()?;

        let mut info = BackendInfo::new(target.name(), target.num_qubits());
        if let Some(version) = target.version() {
            info = info.with_version(version);
        }
        if let Some(gate_set) = target.gate_set() {
            info = info.with_gate_set(gate_set.gates().iter().map(|g| gate_name_to_hiq(g)));
        }
        if let Some(coupling) = target.coupling() {
            info = info.with_architecture(Architecture::new(
                coupling.num_qubits(),
                coupling.edges().to_vec(),
            ));
        }
        Ok(Device::Hiq(info))
    }
}

/// HIQ backend description -> native alsvid target.
pub struct BackendInfoToTargetConverter;

impl DeviceConverter for BackendInfoToTargetConverter {
    fn convert(&self, device: &Device) -> Result<Device, AlsvidError> {
        let info = device.expect_hiq()?;

        let mut target = Target::new(info.name(), info.n_nodes());
        if let Some(version) = info.version() {
            target = target.with_version(version);
        }
        if !info.gate_set().is_empty() {
            let names: Vec<String> =
                info.gate_set().iter().map(|g| gate_name_to_alsvid(g)).collect();
            target = target.with_gate_set(GateSet::new(names));
        }
        if let Some(architecture) = info.architecture() {
            target = target.with_coupling(CouplingMap::from_edges(
                architecture.n_nodes(),
                architecture.edges().iter().copied(),
            ));
        }
        Ok(Device::Target(target))
    }
}
