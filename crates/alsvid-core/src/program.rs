//! Program representations.

use alsvid_ir::Circuit;
use hiq_circ::HiqCircuit;

use crate::error::AlsvidError;

/// A quantum program in one of the supported representations.
///
/// The explicit tagged variant replaces runtime type inspection:
/// auto-detection matches on these variants through the registered
/// predicate list. [`Program::Text`] carries raw source of an
/// unspecified dialect; text never auto-detects and always requires an
/// explicit `program_lib`.
#[derive(Debug, Clone)]
pub enum Program {
    /// A native DAG circuit.
    Circuit(Circuit),
    /// A HIQ command-list circuit.
    Hiq(HiqCircuit),
    /// Raw program text (e.g. OpenQASM 3 source).
    Text(String),
}

impl Program {
    /// Name of the representation, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Program::Circuit(_) => "alsvid circuit",
            Program::Hiq(_) => "hiq circuit",
            Program::Text(_) => "program text",
        }
    }

    /// Borrow as a native circuit.
    pub fn as_circuit(&self) -> Option<&Circuit> {
        match self {
            Program::Circuit(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow as a HIQ circuit.
    pub fn as_hiq(&self) -> Option<&HiqCircuit> {
        match self {
            Program::Hiq(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow as program text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Program::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as a native circuit or fail with a representation error.
    pub fn expect_circuit(&self) -> Result<&Circuit, AlsvidError> {
        self.as_circuit().ok_or(AlsvidError::UnexpectedRepresentation {
            expected: "alsvid circuit",
            found: self.kind_name(),
        })
    }

    /// Borrow as a HIQ circuit or fail with a representation error.
    pub fn expect_hiq(&self) -> Result<&HiqCircuit, AlsvidError> {
        self.as_hiq().ok_or(AlsvidError::UnexpectedRepresentation {
            expected: "hiq circuit",
            found: self.kind_name(),
        })
    }

    /// Borrow as program text or fail with a representation error.
    pub fn expect_text(&self) -> Result<&str, AlsvidError> {
        self.as_text().ok_or(AlsvidError::UnexpectedRepresentation {
            expected: "program text",
            found: self.kind_name(),
        })
    }
}

impl From<Circuit> for Program {
    fn from(circuit: Circuit) -> Self {
        Program::Circuit(circuit)
    }
}

impl From<HiqCircuit> for Program {
    fn from(circuit: HiqCircuit) -> Self {
        Program::Hiq(circuit)
    }
}

impl From<String> for Program {
    fn from(text: String) -> Self {
        Program::Text(text)
    }
}

impl From<&str> for Program {
    fn from(text: &str) -> Self {
        Program::Text(text.to_string())
    }
}
