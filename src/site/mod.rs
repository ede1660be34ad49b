//! Static content: resolving request paths safely and loading what they
//! point at.

pub mod loader;
pub mod resolver;

pub use loader::{load, ContentPayload};
pub use resolver::{resolve, DocumentRoot, ResolvedTarget, TargetKind};
