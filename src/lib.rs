pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod service;
pub mod types;

pub use error::{SchemaPushError, TransportError};
pub use service::SchemaApplier;
pub use types::credentials::{AccessToken, Credentials};
pub use types::script::SchemaScript;
