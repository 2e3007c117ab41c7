use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::key::Keymap;
use crate::types::RecenterPosition;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub kill: KillConfig,
    pub recenter: RecenterConfig,
    /// Extra key bindings in kbd notation, mapped to command names.
    pub bindings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KillConfig {
    /// Consecutive kills from the same spot append to the clipboard.
    pub append_consecutive: bool,
}

impl Default for KillConfig {
    fn default() -> Self {
        Self {
            append_consecutive: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecenterConfig {
    /// Cycle order for repeated recenter commands.
    pub positions: Vec<RecenterPosition>,
}

impl Default for RecenterConfig {
    fn default() -> Self {
        Self {
            positions: vec![
                RecenterPosition::Center,
                RecenterPosition::Top,
                RecenterPosition::Bottom,
            ],
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.recenter.positions.is_empty() {
            return Err(Error::InvalidConfig(
                "recenter.positions must not be empty".to_string(),
            ));
        }
        for (keys, name) in &self.bindings {
            name.parse::<Command>().map_err(|_| {
                Error::InvalidConfig(format!("binding {keys:?} names unknown command {name:?}"))
            })?;
        }
        Ok(())
    }

    /// The default Emacs keymap with this config's bindings layered on top.
    pub fn keymap(&self) -> Result<Keymap> {
        let mut keymap = Keymap::emacs();
        for (keys, name) in &self.bindings {
            keymap.bind_named(keys, name)?;
        }
        Ok(keymap)
    }
}
