//! Configuration input
//!
//! The labeled [`ConfigNode`] tree is the sole construction input for
//! datasources and function graphs. [`EngineConfig`] bundles the trees a
//! host needs into one JSON file.

mod engine;
mod errors;
mod node;

pub use engine::EngineConfig;
pub use errors::{ConfigError, ConfigErrorCode, ConfigResult};
pub use node::ConfigNode;
