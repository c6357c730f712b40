//! Container configuration, loadable from YAML.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Behavioural switches for a [`Container`](crate::Container).
///
/// ```yaml
/// eager_singletons: true
/// allow_overriding: false
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ContainerConfig {
  /// Build singletons while registering them instead of on first resolution. Missing
  /// dependencies then surface from the registration call.
  #[serde(default)]
  pub eager_singletons: bool,
  /// When disabled, binding an abstraction twice fails instead of replacing the
  /// earlier binding.
  #[serde(default = "default_allow_overriding")]
  pub allow_overriding: bool,
}

fn default_allow_overriding() -> bool {
  true
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      eager_singletons: false,
      allow_overriding: default_allow_overriding(),
    }
  }
}

impl ContainerConfig {
  pub fn from_yaml_str(source: &str) -> Result<Self> {
    serde_yaml::from_str(source).map_err(|e| Error::ConfigParse(e.to_string()))
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let reader = BufReader::new(File::open(path)?);
    let config: Self = serde_yaml::from_reader(reader).map_err(|e| Error::ConfigParse(e.to_string()))?;
    tracing::debug!(path = %path.display(), ?config, "container configuration loaded");
    Ok(config)
  }
}
