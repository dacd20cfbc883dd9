use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

const CONFIG_FILE: &str = "config.json";
const STAGING_FILE: &str = ".config.json.partial";

/// Reads and writes the engine [`Config`] as a single JSON document.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager for `<base>/config/config.json`, creating the directory.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        fs::create_dir_all(&config_dir)?;
        Ok(Self::new(config_dir.join(CONFIG_FILE)))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Sibling file a save is written to before replacing the config.
    pub fn staging_path(&self) -> PathBuf {
        self.config_path.with_file_name(STAGING_FILE)
    }

    /// Loads the stored config; a config that was never saved yields defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match fs::read_to_string(&self.config_path) {
            Ok(data) => Config::from_json(&data),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces the stored config. Readers see either the old or the new
    /// document, never a partial one.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let document = config.to_json()?;
        if let Some(dir) = self.config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let staging = self.staging_path();
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&staging)?;
        file.write_all(document.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&staging, &self.config_path)?;
        Ok(())
    }
}
