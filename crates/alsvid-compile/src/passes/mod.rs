//! Built-in compilation passes.

pub mod barriers;
pub mod decompose;
pub mod layout;
pub mod peephole;
pub mod routing;
pub mod synthesis;
pub mod translate;

pub use barriers::RemoveBarriers;
pub use decompose::DecomposeComposites;
pub use layout::TrivialLayout;
pub use peephole::{CliffordSimp, Optimize1qRuns};
pub use routing::SwapRouting;
pub use synthesis::{CancelInverses, MergeRotations};
pub use translate::Rebase;
