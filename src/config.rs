use crate::contracts::{AskConfigurations, Language, Timezone};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AskflowConfig {
    /// Answer language, display name or short code
    pub language: Option<String>,
    /// IANA timezone name, e.g. "Asia/Taipei"
    pub timezone: Option<String>,
    /// Disable colours even on a terminal
    pub plain: Option<bool>,
    pub replay_delay_ms: Option<u64>,
}

impl AskflowConfig {
    /// Request configurations for the AI service
    pub fn ask_configurations(&self) -> anyhow::Result<AskConfigurations> {
        let language = match &self.language {
            Some(raw) => Some(raw.parse::<Language>()?.as_str().to_string()),
            None => None,
        };

        Ok(AskConfigurations {
            language,
            timezone: self.timezone.clone().map(|name| Timezone { name }),
        })
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("askflow.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<AskflowConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        tracing::debug!("No config at {}", path.display());
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: AskflowConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &AskflowConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("askflow.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("askflow.toml");
        let config = AskflowConfig {
            language: Some("zh_tw".into()),
            timezone: Some("Asia/Taipei".into()),
            plain: Some(true),
            replay_delay_ms: Some(250),
        };

        write_config(&path, &config, false).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(config.clone()));

        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &AskflowConfig::default(), true).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(AskflowConfig::default()));
    }

    #[test]
    fn test_ask_configurations() {
        let config = AskflowConfig {
            language: Some("ja".into()),
            timezone: Some("Asia/Tokyo".into()),
            ..Default::default()
        };
        let ask = config.ask_configurations().unwrap();
        assert_eq!(ask.language.as_deref(), Some("Japanese"));
        assert_eq!(ask.timezone.unwrap().name, "Asia/Tokyo");

        let bad = AskflowConfig {
            language: Some("Elvish".into()),
            ..Default::default()
        };
        assert!(bad.ask_configurations().is_err());
    }
}
