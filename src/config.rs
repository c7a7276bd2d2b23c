use std::path::{Path, PathBuf};

use anyhow::{Context, Error};
use log::debug;
use serde::{Deserialize, Serialize};

use ucsm_api::{
    config::BootDevice,
    constants::{ORG_ROOT, UCSMKIT_STORE_PATH_DEFAULT},
};

/// Definition of the ucsmkit configuration file.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    /// Path of the object store.
    /// Default is /var/lib/ucsmkit/store.yaml.
    pub store: Option<PathBuf>,

    /// Organization that holds the boot policies.
    /// Default is org-root.
    pub org: Option<String>,
}

impl ConfigFile {
    /// Loads the configuration file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file '{}' does not exist, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read configuration file '{}'", path.display()))?;
        serde_yaml::from_str(&contents)
            .context(format!("Failed to parse configuration file '{}'", path.display()))
    }

    pub fn store_path(&self) -> PathBuf {
        self.store
            .clone()
            .unwrap_or_else(|| PathBuf::from(UCSMKIT_STORE_PATH_DEFAULT))
    }

    pub fn org_dn(&self) -> String {
        self.org.clone().unwrap_or_else(|| ORG_ROOT.to_string())
    }
}

/// Reads a boot device list from a YAML file.
pub fn load_device_list(path: impl AsRef<Path>) -> Result<Vec<BootDevice>, Error> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .context(format!("Failed to read device list '{}'", path.display()))?;
    serde_yaml::from_str(&contents)
        .context(format!("Failed to parse device list '{}'", path.display()))
}
