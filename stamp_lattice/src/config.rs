//! Configuration for stamp construction and diagnostics.
//!
//! ```toml
//! # stamps.toml
//! trust_interfaces = false
//! diagnostics = true
//! ```

use crate::diagnostics::DiagnosticsCollector;
use crate::error::{StampError, StampResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stamp-layer settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StampConfig {
    /// Treat declared interface types as verified, keeping them in declared stamps.
    pub trust_interfaces: bool,
    /// Collect precision-loss diagnostics on the configuring thread.
    pub diagnostics: bool,
}

impl StampConfig {
    pub fn from_toml_str(source: &str) -> StampResult<Self> {
        toml::from_str(source).map_err(|e| StampError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> StampResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| StampError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Applies the thread-local parts of the configuration to the calling thread.
    pub fn apply(&self) {
        if self.diagnostics {
            DiagnosticsCollector::enable();
        } else {
            DiagnosticsCollector::disable();
        }
    }
}
