//! Configuration for the CLI.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Configuration for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// The node to connect to
    pub node: String,
    /// The network to connect to
    pub network: String,
    /// Default sender account address, overridable with `--sender`
    pub sender: Option<String>,
    /// Deadline for each node request, in seconds
    pub request_timeout_secs: u64,
    /// Explorer base URL used to print transaction links
    pub explorer_url: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            node: "http://127.0.0.1:9000".to_string(),
            network: "mainnet".to_string(),
            sender: None,
            request_timeout_secs: 30,
            explorer_url: None,
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The default configuration file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("multisend");
        path.push("config.json");
        Some(path)
    }

    /// Link to a transaction in the configured explorer, if one is set.
    pub fn explorer_link(&self, digest: &str) -> Option<String> {
        self.explorer_url
            .as_ref()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), digest))
    }
}
