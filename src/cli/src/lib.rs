//! Command-line front end for the batch distribution engine.

pub mod commands;
pub mod config;
pub mod errors;
pub mod recipients;
pub mod rpc;

// Re-export commonly used types and functions
pub use commands::{balance, check, estimate, send};
pub use config::CliConfig;
pub use errors::CliError;
pub use rpc::RpcClient;
