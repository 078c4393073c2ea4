pub mod applier;
pub mod connectivity;

pub use applier::SchemaApplier;
