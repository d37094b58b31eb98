//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "MARKCHECK_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "markcheck.db";

/// Resolve the root folder, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. MARKCHECK_ROOT environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent default data directory (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    default_root_folder()
}

/// Create the root folder if missing and return the database path
pub fn ensure_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)
        .map_err(|e| Error::Config(format!("Failed to create root folder {:?}: {}", root, e)))?;
    Ok(root.join(DATABASE_FILE))
}

/// Locate the configuration file for the platform
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("markcheck").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/markcheck/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("markcheck"))
        .unwrap_or_else(|| PathBuf::from("./markcheck_data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cli_arg_takes_priority() {
        std::env::set_var(ROOT_ENV_VAR, "/tmp/from-env");
        let resolved = resolve_root_folder(Some(Path::new("/tmp/from-cli")));
        std::env::remove_var(ROOT_ENV_VAR);

        assert_eq!(resolved, PathBuf::from("/tmp/from-cli"));
    }

    #[test]
    #[serial]
    fn test_env_var_used_when_no_cli_arg() {
        std::env::set_var(ROOT_ENV_VAR, "/tmp/from-env");
        let resolved = resolve_root_folder(None);
        std::env::remove_var(ROOT_ENV_VAR);

        assert_eq!(resolved, PathBuf::from("/tmp/from-env"));
    }

    #[test]
    #[serial]
    fn test_fallback_is_nonempty_path() {
        std::env::remove_var(ROOT_ENV_VAR);
        let resolved = resolve_root_folder(None);
        assert!(!resolved.as_os_str().is_empty());
    }

    #[test]
    fn test_ensure_root_folder_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("markcheck");

        let db_path = ensure_root_folder(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(db_path, root.join(DATABASE_FILE));
    }
}
