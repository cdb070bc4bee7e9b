use anyhow::{anyhow, Result};
use bible_lookup::{Locale, Shape};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE: &str = "Bible_KRV";
pub const DEFAULT_CONTEXT_RADIUS: usize = 2;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub source: Option<String>,
    pub shape: Option<Shape>,
    pub locale: Option<Locale>,
    pub context_radius: Option<usize>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Remember the radius the reader settled on.
    pub fn save_context_radius(radius: usize) -> Result<()> {
        Self::save_context_radius_to(&Self::get_config_path()?, radius)
    }

    /// Update only the radius. A file that does not parse is left as it is
    /// and reported, so other settings in it are never lost.
    pub fn save_context_radius_to(config_path: &Path, radius: usize) -> Result<()> {
        let mut config = Self::load_from(config_path)?;
        config.context_radius = Some(radius);
        config.save_to(config_path)
    }

    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(DEFAULT_SOURCE)
    }

    pub fn locale(&self) -> Locale {
        self.locale.unwrap_or_default()
    }

    pub fn context_radius(&self) -> usize {
        self.context_radius.unwrap_or(DEFAULT_CONTEXT_RADIUS)
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("bible-lookup").join("config.json"))
    }
}
