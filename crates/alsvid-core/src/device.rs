//! Device representations.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use alsvid_compile::Target;
use hiq_circ::BackendInfo;

use crate::error::AlsvidError;

/// A device in one of the supported representations: a native target
/// of either circuit ecosystem, or an abstract QDMI-style description
/// convertible into both.
#[derive(Debug, Clone)]
pub enum Device {
    /// Native alsvid compilation target.
    Target(Target),
    /// HIQ backend description.
    Hiq(BackendInfo),
    /// Abstract device description.
    Qdmi(QdmiDevice),
}

impl Device {
    /// Name of the representation, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Device::Target(_) => "alsvid target",
            Device::Hiq(_) => "hiq backend info",
            Device::Qdmi(_) => "qdmi device",
        }
    }

    /// Borrow as a native target or fail with a representation error.
    pub fn expect_target(&self) -> Result<&Target, AlsvidError> {
        match self {
            Device::Target(t) => Ok(t),
            other => Err(AlsvidError::UnexpectedRepresentation {
                expected: "alsvid target",
                found: other.kind_name(),
            }),
        }
    }

    /// Borrow as a HIQ backend description or fail.
    pub fn expect_hiq(&self) -> Result<&BackendInfo, AlsvidError> {
        match self {
            Device::Hiq(info) => Ok(info),
            other => Err(AlsvidError::UnexpectedRepresentation {
                expected: "hiq backend info",
                found: other.kind_name(),
            }),
        }
    }
}

impl From<Target> for Device {
    fn from(target: Target) -> Self {
        Device::Target(target)
    }
}

impl From<BackendInfo> for Device {
    fn from(info: BackendInfo) -> Self {
        Device::Hiq(info)
    }
}

impl From<QdmiDevice> for Device {
    fn from(device: QdmiDevice) -> Self {
        Device::Qdmi(device)
    }
}

/// One qubit of an abstract device description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QdmiQubit {
    /// Physical qubit id.
    pub id: u32,
    /// Single-qubit fidelity, when calibrated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<f64>,
    /// Gate durations in nanoseconds, keyed by gate name.
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub gate_durations: FxHashMap<String, f64>,
}

/// One coupling edge of an abstract device description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdmiCoupling {
    /// Control-side qubit id.
    pub control: u32,
    /// Target-side qubit id.
    pub target: u32,
    /// Two-qubit fidelity, when calibrated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<f64>,
    /// Two-qubit gate duration in nanoseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Abstract device description: qubits with fidelities and gate
/// durations, plus coupling edges. Deserializable from the usual
/// JSON calibration payloads and convertible into each ecosystem's
/// native device representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdmiDevice {
    /// Device name.
    pub name: String,
    /// Declared qubits.
    pub qubits: Vec<QdmiQubit>,
    /// Declared couplings; empty means fully connected.
    #[serde(default)]
    pub couplings: Vec<QdmiCoupling>,
}

impl QdmiDevice {
    /// Create a device with plain numbered qubits and no couplings.
    pub fn with_qubit_count(name: impl Into<String>, n: u32) -> Self {
        Self {
            name: name.into(),
            qubits: (0..n)
                .map(|id| QdmiQubit {
                    id,
                    ..QdmiQubit::default()
                })
                .collect(),
            couplings: vec![],
        }
    }

    /// Add a coupling edge.
    #[must_use]
    pub fn with_coupling(mut self, control: u32, target: u32) -> Self {
        self.couplings.push(QdmiCoupling {
            control,
            target,
            fidelity: None,
            duration: None,
        });
        self
    }

    /// Number of physical qubits, accounting for sparse ids.
    pub fn qubit_count(&self) -> u32 {
        let max_id = self.qubits.iter().map(|q| q.id + 1).max().unwrap_or(0);
        max_id.max(u32::try_from(self.qubits.len()).unwrap_or(u32::MAX))
    }
}
