use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    /// Load `~/.phiscribe/config.toml`, writing defaults on first run.
    ///
    /// Environment overrides are applied and the result validated before
    /// it is returned; the persisted file never receives env values.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let phiscribe_dir = home.join(".phiscribe");
        let config_path = phiscribe_dir.join("config.toml");

        if !phiscribe_dir.exists() {
            fs::create_dir_all(&phiscribe_dir).context("Failed to create .phiscribe directory")?;
        }

        if !config_path.exists() {
            let config = Self {
                config_path: config_path.clone(),
                ..Self::default()
            };
            config.save()?;
        }

        Self::load_from(&config_path)
    }

    /// Load a specific config file, apply env overrides, and validate.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        config.config_path = path.to_path_buf();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
