//! Configuration file management for rakeopt.
//!
//! Provides a TOML-based config file at `~/.config/rakeopt/config.toml` and a
//! resolution chain for the server address: CLI flag > env var > config
//! file > default. The Gemini credential is never stored here; it is read
//! from the environment on every call.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    pub server: ServerSection,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the rakeopt config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/rakeopt` or `~/.config/rakeopt`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("rakeopt");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("rakeopt")
}

/// Return the path to the rakeopt config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved server address, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub bind: String,
    pub port: u16,
}

impl ServeConfig {
    pub const DEFAULT_BIND: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 8000;

    /// Resolve using the chain: CLI flag > env var > config file > default.
    ///
    /// - Bind: `cli_bind` > `RAKEOPT_BIND` env > `server.bind` > `127.0.0.1`
    /// - Port: `cli_port` > `RAKEOPT_PORT` env > `server.port` > `8000`
    pub fn resolve(cli_bind: Option<&str>, cli_port: Option<u16>) -> Result<Self> {
        let file_config = load_config().ok();

        let bind = if let Some(bind) = cli_bind {
            bind.to_string()
        } else if let Ok(bind) = std::env::var("RAKEOPT_BIND") {
            bind
        } else if let Some(ref cfg) = file_config {
            cfg.server.bind.clone()
        } else {
            Self::DEFAULT_BIND.to_string()
        };

        let port = if let Some(port) = cli_port {
            port
        } else if let Ok(port) = std::env::var("RAKEOPT_PORT") {
            port.parse::<u16>()
                .with_context(|| format!("RAKEOPT_PORT env var is not a valid port: {port:?}"))?
        } else if let Some(ref cfg) = file_config {
            cfg.server.port
        } else {
            Self::DEFAULT_PORT
        };

        Ok(Self { bind, port })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    /// Point config lookups at a fresh temp dir for the duration of `f`.
    fn with_temp_config_home<T>(f: impl FnOnce(&std::path::Path) -> T) -> T {
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        let out = f(tmp.path());

        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }
        out
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let _lock = lock_env();
        let original = ConfigFile {
            server: ServerSection {
                bind: "0.0.0.0".to_string(),
                port: 9090,
            },
        };

        let loaded = with_temp_config_home(|home| {
            save_config(&original).unwrap();
            assert!(home.join("rakeopt/config.toml").exists());
            load_config().unwrap()
        });

        assert_eq!(loaded, original);
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = lock_env();
        let mode = with_temp_config_home(|_| {
            save_config(&ConfigFile {
                server: ServerSection {
                    bind: "127.0.0.1".to_string(),
                    port: 8000,
                },
            })
            .unwrap();
            std::fs::metadata(config_path()).unwrap().permissions().mode()
        });
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn resolve_with_cli_flags_overrides_all() {
        let _lock = lock_env();
        let cfg = with_temp_config_home(|_| {
            save_config(&ConfigFile {
                server: ServerSection {
                    bind: "192.168.1.5".to_string(),
                    port: 8100,
                },
            })
            .unwrap();
            unsafe { std::env::set_var("RAKEOPT_BIND", "10.0.0.1") };
            unsafe { std::env::set_var("RAKEOPT_PORT", "7000") };

            let cfg = ServeConfig::resolve(Some("0.0.0.0"), Some(9000)).unwrap();

            unsafe { std::env::remove_var("RAKEOPT_BIND") };
            unsafe { std::env::remove_var("RAKEOPT_PORT") };
            cfg
        });

        assert_eq!(cfg.bind, "0.0.0.0");
        assert_eq!(cfg.port, 9000);
    }

    #[test]
    fn resolve_with_env_overrides_config_file() {
        let _lock = lock_env();
        let cfg = with_temp_config_home(|_| {
            save_config(&ConfigFile {
                server: ServerSection {
                    bind: "192.168.1.5".to_string(),
                    port: 8100,
                },
            })
            .unwrap();
            unsafe { std::env::set_var("RAKEOPT_PORT", "7000") };
            let cfg = ServeConfig::resolve(None, None);
            unsafe { std::env::remove_var("RAKEOPT_PORT") };
            cfg.unwrap()
        });

        assert_eq!(cfg.bind, "192.168.1.5", "bind comes from the file");
        assert_eq!(cfg.port, 7000, "port comes from the env var");
    }

    #[test]
    fn resolve_defaults_when_nothing_set() {
        let _lock = lock_env();
        unsafe { std::env::remove_var("RAKEOPT_BIND") };
        unsafe { std::env::remove_var("RAKEOPT_PORT") };

        let cfg = with_temp_config_home(|_| ServeConfig::resolve(None, None).unwrap());

        assert_eq!(cfg.bind, ServeConfig::DEFAULT_BIND);
        assert_eq!(cfg.port, ServeConfig::DEFAULT_PORT);
    }

    #[test]
    fn resolve_rejects_invalid_port_env() {
        let _lock = lock_env();
        unsafe { std::env::set_var("RAKEOPT_PORT", "not-a-port") };
        let result = ServeConfig::resolve(None, None);
        unsafe { std::env::remove_var("RAKEOPT_PORT") };

        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("RAKEOPT_PORT"), "unexpected error: {msg}");
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("rakeopt/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
