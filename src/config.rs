//! Server configuration
//!
//! Command-line flags with environment fallbacks, plus an optional JSON
//! policy file describing tables and roles.
//!
//! Policy file layout:
//!
//! ```json
//! {
//!   "tables": {
//!     "users": { "fields": [ {"name": "id", "type": "int", "sensitivity": "public"} ] }
//!   },
//!   "roles": { "basic": ["public"] }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::audit::DEFAULT_AUDIT_CAPACITY;
use crate::catalog::{builtin, Catalog, CatalogError, FieldDef, Sensitivity, TableDef};
use crate::generator::openai::{OpenAiConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::policy::RolePolicy;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid policy file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Parser, Debug, Clone)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Field-level access guard for generated SQL")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:5000", env = "FIELDGUARD_BIND")]
    pub bind: SocketAddr,

    /// JSON file with tables and roles (built-in demo policy when absent)
    #[arg(long, env = "FIELDGUARD_POLICY_FILE")]
    pub policy_file: Option<PathBuf>,

    /// Maximum number of audit log entries
    #[arg(long, default_value_t = DEFAULT_AUDIT_CAPACITY, env = "FIELDGUARD_AUDIT_CAPACITY")]
    pub audit_capacity: usize,

    /// API key for the chat-completions endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the chat-completions API
    #[arg(long, default_value = DEFAULT_API_BASE, env = "FIELDGUARD_API_BASE")]
    pub api_base: String,

    /// Model name
    #[arg(long, default_value = DEFAULT_MODEL, env = "FIELDGUARD_MODEL")]
    pub model: String,

    /// Generator request timeout in seconds
    #[arg(long, default_value_t = 30, env = "FIELDGUARD_GENERATOR_TIMEOUT")]
    pub generator_timeout_secs: u64,
}

impl ServerConfig {
    /// Generator client settings
    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.generator_timeout_secs),
            ..OpenAiConfig::default()
        }
    }

    /// Catalog and roles from the policy file, or the built-in demo policy
    pub fn load_policy(&self) -> ConfigResult<(Catalog, RolePolicy)> {
        match &self.policy_file {
            Some(path) => PolicyFile::load(path)?.build(),
            None => Ok((builtin::demo_catalog()?, RolePolicy::builtin())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    fields: Vec<FieldDef>,
}

/// Parsed policy file
#[derive(Debug, Deserialize)]
pub struct PolicyFile {
    tables: BTreeMap<String, TableEntry>,
    #[serde(default)]
    roles: BTreeMap<String, Vec<Sensitivity>>,
}

impl PolicyFile {
    /// Read and parse a policy file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse policy JSON
    pub fn parse(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the catalog and role policy
    pub fn build(self) -> ConfigResult<(Catalog, RolePolicy)> {
        let mut catalog = Catalog::new();
        let mut used: BTreeSet<Sensitivity> = BTreeSet::new();
        for (name, entry) in self.tables {
            used.extend(entry.fields.iter().map(|f| f.sensitivity.clone()));
            let def = entry
                .fields
                .into_iter()
                .fold(TableDef::new(name), |t, f| t.field(f));
            catalog.create_table(def)?;
        }

        let mut policy = RolePolicy::new();
        for (role, labels) in self.roles {
            for label in labels.iter().filter(|l| !used.contains(*l)) {
                warn!(role = %role, label = %label, "role grants a label no field carries");
            }
            policy.insert_role(role, labels);
        }

        Ok((catalog, policy))
    }
}
