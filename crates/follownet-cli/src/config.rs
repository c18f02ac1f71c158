use anyhow::{Context, Result, bail};
use follownet_core::AnalysisConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Load the analysis configuration
///
/// An explicit path must exist. Without one the default location is tried
/// and built-in defaults are used when nothing is there.
pub fn load(path: Option<&str>) -> Result<AnalysisConfig> {
    let config = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            read(&path)?
        }
        None => {
            let path = default_path();
            if path.exists() {
                read(&path)?
            } else {
                AnalysisConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("follownet")
        .join("config.toml")
}

fn read(path: &Path) -> Result<AnalysisConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: AnalysisConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_passes = 9\nseed = 42\n").unwrap();

        let config = load(path.to_str()).unwrap();
        assert_eq!(config.max_passes, 9);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.top_n, AnalysisConfig::default().top_n);
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load(path.to_str()).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "connection_batch_size = 0\n").unwrap();
        assert!(load(path.to_str()).is_err());
    }

    #[test]
    fn test_default_path_layout() {
        let path = default_path();
        assert!(path.ends_with("follownet/config.toml"));
    }
}
