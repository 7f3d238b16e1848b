//! The four stages of the changeset pipeline, as plain functions over the
//! data model. The deploy operation wires them into a [`delta_pipeline`]
//! pipeline.

mod assembler;
mod classifier;
mod resolver;
mod scope;

pub use assembler::PackageAssembler;
pub use classifier::{classify, classify_path};
pub use resolver::{RevisionRange, resolve};
pub use scope::build_scope;
