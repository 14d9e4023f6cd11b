//! Configuration lookup, fallback logic, and environment overrides

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use uplink_core::error::UplinkError;

use crate::toml::{self as uplink_toml, UplinkSection, UplinkToml};
use crate::ConfigResult;

/// File name searched for in the project directory and its parents
pub const CONFIG_FILE_NAME: &str = "uplink.toml";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Path given explicitly on the command line
    Explicit(Utf8PathBuf),
    /// uplink.toml found in the project tree
    Project(Utf8PathBuf),
    /// Global config file
    Global(Utf8PathBuf),
    /// Built-in defaults
    Default,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Load configuration with fallbacks: explicit path, project file, global file, defaults
    pub async fn load(&self, explicit: Option<&Utf8Path>) -> ConfigResult<(UplinkToml, ConfigSource)> {
        if let Some(path) = explicit {
            let path = self.cwd.join(path);
            let config = uplink_toml::load_from_file(&path).await?;
            return Ok((config, ConfigSource::Explicit(path)));
        }

        if let Some(path) = self.find_project_config() {
            debug!("Using project config at {}", path);
            let config = uplink_toml::load_from_file(&path).await?;
            return Ok((config, ConfigSource::Project(path)));
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                debug!("Using global config at {}", path);
                let config = uplink_toml::load_from_file(&path).await?;
                return Ok((config, ConfigSource::Global(path)));
            }
        }

        Ok((UplinkToml::default(), ConfigSource::Default))
    }

    /// Find uplink.toml in the working directory or any parent
    pub fn find_project_config(&self) -> Option<Utf8PathBuf> {
        let mut current = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Some(candidate);
            }
            current = dir.parent();
        }

        None
    }

    /// Location of the per-user config file
    pub fn global_config_path() -> Option<Utf8PathBuf> {
        let home_dir = dirs::home_dir()?;
        let home_dir = Utf8PathBuf::try_from(home_dir).ok()?;
        Some(home_dir.join(".uplink").join("config.toml"))
    }

    /// Look up a named uplink
    pub fn select<'a>(config: &'a UplinkToml, name: &str) -> ConfigResult<&'a UplinkSection> {
        config.uplinks.get(name).ok_or_else(|| {
            let available: Vec<&str> = config.uplinks.keys().map(String::as_str).collect();
            UplinkError::config(
                "uplink",
                format!("No uplink named '{}' (available: {})", name, available.join(", ")),
            )
        })
    }

    /// Apply environment variable overrides to one uplink
    pub fn apply_env_overrides(
        config: &mut UplinkToml,
        uplink: &str,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        // UPLINK_URL alone may introduce an uplink the file does not define
        if !config.uplinks.contains_key(uplink) {
            match overrides.get("UPLINK_URL") {
                Some(url) => {
                    config.uplinks.insert(uplink.to_string(), UplinkSection::new(url.clone()));
                },
                None => return Ok(()),
            }
        }

        let Some(section) = config.uplinks.get_mut(uplink) else {
            return Ok(());
        };

        for (key, value) in overrides {
            match key.as_str() {
                "UPLINK_URL" => {
                    section.url = value.clone();
                },
                "UPLINK_TIMEOUT_SECS" => {
                    let secs = value.parse().map_err(|e| {
                        UplinkError::config(key.clone(), format!("Invalid seconds '{}': {}", value, e))
                    })?;
                    section.timeout = Some(uplink_toml::TimeoutSpec::Seconds(secs));
                },
                "UPLINK_MAX_RETRIES" => {
                    let retries = value.parse().map_err(|e| {
                        UplinkError::config(key.clone(), format!("Invalid retry count '{}': {}", value, e))
                    })?;
                    section.max_retries = Some(retries);
                },
                "UPLINK_TOKEN" => {
                    section.token = Some(value.clone());
                },
                _ => {
                    // Unknown environment variable, ignore
                },
            }
        }

        uplink_toml::validate_section(uplink, section)
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with("UPLINK_"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn temp_path(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
    }

    #[tokio::test]
    async fn test_find_project_config_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_path(&temp_dir);
        let nested = root.join("a").join("b");
        tokio::fs::create_dir_all(&nested).await.unwrap();
        tokio::fs::write(root.join(CONFIG_FILE_NAME), "[uplinks.local]\nurl = \"http://localhost:4873\"\n")
            .await
            .unwrap();

        let loader = ConfigLoader::new(nested);
        assert_eq!(loader.find_project_config(), Some(root.join(CONFIG_FILE_NAME)));

        let (config, source) = loader.load(None).await.unwrap();
        assert_eq!(source, ConfigSource::Project(root.join(CONFIG_FILE_NAME)));
        assert!(config.uplinks.contains_key("local"));
    }

    #[tokio::test]
    async fn test_explicit_path_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_path(&temp_dir);
        tokio::fs::write(root.join(CONFIG_FILE_NAME), "[uplinks.project]\nurl = \"http://a.example\"\n")
            .await
            .unwrap();
        tokio::fs::write(root.join("other.toml"), "[uplinks.other]\nurl = \"http://b.example\"\n")
            .await
            .unwrap();

        let loader = ConfigLoader::new(root.clone());
        let (config, source) = loader.load(Some(Utf8Path::new("other.toml"))).await.unwrap();

        assert_eq!(source, ConfigSource::Explicit(root.join("other.toml")));
        assert!(config.uplinks.contains_key("other"));
        assert!(!config.uplinks.contains_key("project"));
    }

    #[tokio::test]
    async fn test_explicit_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::new(temp_path(&temp_dir));

        let result = loader.load(Some(Utf8Path::new("absent.toml"))).await;
        assert!(matches!(result, Err(UplinkError::Io { .. })));
    }

    #[test]
    fn test_select_unknown_uplink_lists_available() {
        let config = UplinkToml::default();

        assert!(ConfigLoader::select(&config, "npmjs").is_ok());
        match ConfigLoader::select(&config, "missing").unwrap_err() {
            UplinkError::Config { field, reason } => {
                assert_eq!(field, "uplink");
                assert!(reason.contains("npmjs"));
            },
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_env_overrides_apply_to_selected_uplink() {
        let mut config = UplinkToml::default();
        let overrides: HashMap<String, String> = [
            ("UPLINK_URL", "http://localhost:4873"),
            ("UPLINK_TIMEOUT_SECS", "7"),
            ("UPLINK_MAX_RETRIES", "0"),
            ("UPLINK_TOKEN", "abc"),
            ("UPLINK_UNRELATED", "ignored"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        ConfigLoader::apply_env_overrides(&mut config, "npmjs", &overrides).unwrap();

        let section = &config.uplinks["npmjs"];
        assert_eq!(section.url, "http://localhost:4873");
        assert_eq!(section.timeout().unwrap(), Duration::from_secs(7));
        assert_eq!(section.max_retries(), 0);
        assert_eq!(section.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_env_overrides_without_url_leave_unknown_uplink_alone() {
        let mut config = UplinkToml::default();
        let overrides = HashMap::from([("UPLINK_TOKEN".to_string(), "abc".to_string())]);

        ConfigLoader::apply_env_overrides(&mut config, "internal", &overrides).unwrap();
        assert!(!config.uplinks.contains_key("internal"));

        let overrides = HashMap::from([("UPLINK_URL".to_string(), "http://localhost:4873".to_string())]);
        ConfigLoader::apply_env_overrides(&mut config, "internal", &overrides).unwrap();
        assert_eq!(config.uplinks["internal"].url, "http://localhost:4873");
    }

    #[test]
    fn test_env_override_validation() {
        let mut config = UplinkToml::default();
        let overrides = HashMap::from([("UPLINK_MAX_RETRIES".to_string(), "many".to_string())]);
        assert!(ConfigLoader::apply_env_overrides(&mut config, "npmjs", &overrides).is_err());

        let overrides = HashMap::from([("UPLINK_URL".to_string(), "not a url".to_string())]);
        assert!(ConfigLoader::apply_env_overrides(&mut config, "npmjs", &overrides).is_err());
    }
}
