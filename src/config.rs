use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SkyrecordsConfig {
    pub database: Option<PathBuf>,
    pub log_level: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("skyrecords.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SkyrecordsConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SkyrecordsConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &SkyrecordsConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Pick the database path: explicit flag first, then the config file.
pub fn resolve_database(flag: Option<PathBuf>, config: Option<&SkyrecordsConfig>) -> anyhow::Result<PathBuf> {
    flag.or_else(|| config.and_then(|c| c.database.clone()))
        .ok_or_else(|| anyhow::anyhow!("no database given (pass --database or set `database` in skyrecords.toml)"))
}
