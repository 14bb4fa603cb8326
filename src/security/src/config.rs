//! Configuration loading
//!
//! ```toml
//! exec = ["permissions.cfg"]
//!
//! [console]
//! principal = "system.console"
//! log_level = "info"
//!
//! [[ace]]
//! principal = "group.admin"
//! object = "command"
//! access = "allow"
//!
//! [[inheritance]]
//! child = "identifier.steam:110000112345678"
//! parent = "group.admin"
//! ```

use crate::context::{Context, CONSOLE_PRINCIPAL};
use crate::error::{Result, SecurityError};
use crate::types::AccessType;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete security configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub console: ConsoleSection,

    #[serde(default, rename = "ace")]
    pub aces: Vec<AceEntry>,

    #[serde(default, rename = "inheritance")]
    pub inheritances: Vec<InheritanceEntry>,

    /// Command scripts run after the rules above are applied
    #[serde(default)]
    pub exec: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleSection {
    #[serde(default = "default_principal")]
    pub principal: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            principal: default_principal(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AceEntry {
    pub principal: String,
    pub object: String,
    pub access: AccessType,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InheritanceEntry {
    pub child: String,
    pub parent: String,
}

fn default_principal() -> String { CONSOLE_PRINCIPAL.to_string() }
fn default_log_level() -> String { "info".to_string() }

impl SecurityConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_toml(&contents)?;

        // scripts are relative to the config file
        if let Some(dir) = path.as_ref().parent() {
            for script in &mut config.exec {
                if script.is_relative() {
                    *script = dir.join(&*script);
                }
            }
        }

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: SecurityConfig = toml::from_str(contents)
            .map_err(|e| SecurityError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.console.principal.trim().is_empty() {
            return Err(SecurityError::Config("console.principal cannot be empty".to_string()));
        }

        if let Some(ace) = self.aces.iter().find(|ace| ace.access == AccessType::Unset) {
            return Err(SecurityError::Config(format!(
                "ace {} -> {} must be 'allow' or 'deny'",
                ace.principal, ace.object
            )));
        }

        Ok(())
    }

    /// Add the configured rules and inheritance edges to `context`
    pub fn apply(&self, context: &Context) {
        for ace in &self.aces {
            context.add_access_control_entry(ace.principal.as_str(), ace.object.as_str(), ace.access);
        }

        for edge in &self.inheritances {
            context.add_principal_inheritance(edge.child.as_str(), edge.parent.as_str());
        }
    }
}
