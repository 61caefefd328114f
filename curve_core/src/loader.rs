use crate::config::ProgressionFileConfig;
use crate::table::ProgressionTable;
use crate::ConfigError;
use std::path::Path;

impl ProgressionTable {
    /// Load and merge every progression file in a directory (recursively)
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut table = Self::new();
        table.load_dir(dir)?;
        table.validate().map_err(|e| ConfigError::Validation {
            message: e.to_string(),
            path: dir.to_path_buf(),
        })?;
        Ok(table)
    }

    /// Load a single progression file
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;

        let config: ProgressionFileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                error: e,
                path: path.to_path_buf(),
            })?;

        let table = Self::from_config(config).map_err(|e| ConfigError::Validation {
            message: e.to_string(),
            path: path.to_path_buf(),
        })?;

        tracing::debug!(
            path = %path.display(),
            curves = table.len(),
            "loaded progression file"
        );
        Ok(table)
    }

    /// Parse progression content from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let path = Path::new("<inline>");
        let config: ProgressionFileConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse {
                error: e,
                path: path.to_path_buf(),
            })?;

        Self::from_config(config).map_err(|e| ConfigError::Validation {
            message: e.to_string(),
            path: path.to_path_buf(),
        })
    }

    fn load_dir(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            let path = entry.path();

            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                let file_table = Self::load_file(&path)?;
                self.merge(file_table).map_err(|e| ConfigError::Validation {
                    message: e.to_string(),
                    path: path.clone(),
                })?;
            }
        }

        Ok(())
    }
}
