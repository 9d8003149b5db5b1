use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::{ARCHIVE_DIR, DEFAULT_DESCRIPTION, LOG_FILE, REPORT_FILE, UNKNOWN};
use crate::error::AppError;
use crate::utils::Timezone;

/// Optional on-disk configuration (`config.toml`)
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) histfile: Option<PathBuf>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) debug: bool,
}

impl Config {
    /// Load the first config file that exists and parses.
    ///
    /// An explicit `HISTDUMP_CONFIG` path must parse; the well-known
    /// locations are skipped with a warning when broken.
    pub(crate) fn load(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        if let Some(explicit) = env("HISTDUMP_CONFIG") {
            let path = PathBuf::from(explicit);
            let content =
                fs::read_to_string(&path).map_err(|e| AppError::io("read config", &path, e))?;
            return Self::parse(&path, &content);
        }

        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match Self::parse(&path, &content) {
                    Ok(config) => return Ok(config),
                    Err(e) => eprintln!("Warning: {e}"),
                }
            }
        }

        Ok(Self::default())
    }

    fn parse(path: &Path, content: &str) -> Result<Self, AppError> {
        toml::from_str::<Config>(content).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/histdump/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("histdump").join("config.toml"));
        }

        // 2. Platform config dir (differs from the above on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("histdump").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.histdump.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".histdump.toml"));
        }

        paths
    }
}

/// Values given on the command line; they win over env and config.
#[derive(Debug, Clone, Default)]
pub(crate) struct Overrides {
    pub(crate) dir: Option<PathBuf>,
    pub(crate) histfile: Option<PathBuf>,
    pub(crate) timezone: Option<String>,
    pub(crate) debug: bool,
}

/// Everything an operation needs to know about its environment,
/// resolved once at startup.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) base_dir: PathBuf,
    pub(crate) history_file: PathBuf,
    pub(crate) user: String,
    pub(crate) description: String,
    pub(crate) timezone: Timezone,
    pub(crate) debug: bool,
}

impl Settings {
    pub(crate) fn resolve(
        overrides: &Overrides,
        config: &Config,
        env: &dyn Fn(&str) -> Option<String>,
        home: Option<&Path>,
    ) -> Result<Self, AppError> {
        let home = home
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);

        let base_dir = overrides
            .dir
            .clone()
            .or_else(|| non_empty(env("HISTDUMP_DIR")).map(PathBuf::from))
            .or_else(|| config.dir.clone())
            .map(|p| expand_tilde(&p, &home))
            .unwrap_or_else(|| home.join(".histdump"));

        let history_file = overrides
            .histfile
            .clone()
            .or_else(|| non_empty(env("HISTFILE")).map(PathBuf::from))
            .or_else(|| config.histfile.clone())
            .map(|p| expand_tilde(&p, &home))
            .unwrap_or_else(|| home.join(".bash_history"));

        let user = non_empty(env("USER"))
            .or_else(|| non_empty(env("USERNAME")))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let description = config
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let timezone = Timezone::parse(
            overrides
                .timezone
                .as_deref()
                .or(config.timezone.as_deref()),
        )?;

        Ok(Settings {
            base_dir,
            history_file,
            user,
            description,
            timezone,
            debug: overrides.debug || config.debug,
        })
    }

    pub(crate) fn report_path(&self) -> PathBuf {
        self.base_dir.join(REPORT_FILE)
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.base_dir.join(LOG_FILE)
    }

    pub(crate) fn archive_dir(&self) -> PathBuf {
        self.base_dir.join(ARCHIVE_DIR)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn expand_tilde(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_paths() {
        let paths = Config::get_config_paths();
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.to_string_lossy().contains("histdump")));
    }

    #[test]
    fn defaults_hang_off_home() {
        let env = env_from(&[]);
        let settings = Settings::resolve(
            &Overrides::default(),
            &Config::default(),
            &env,
            Some(Path::new("/home/ada")),
        )
        .unwrap();
        assert_eq!(settings.base_dir, PathBuf::from("/home/ada/.histdump"));
        assert_eq!(settings.history_file, PathBuf::from("/home/ada/.bash_history"));
        assert_eq!(settings.user, "unknown");
        assert_eq!(settings.description, DEFAULT_DESCRIPTION);
        assert_eq!(
            settings.report_path(),
            PathBuf::from("/home/ada/.histdump/bash_history.md")
        );
        assert_eq!(
            settings.log_path(),
            PathBuf::from("/home/ada/.histdump/histdump.log")
        );
        assert_eq!(
            settings.archive_dir(),
            PathBuf::from("/home/ada/.histdump/archive")
        );
    }

    #[test]
    fn cli_beats_env_beats_config() {
        let env = env_from(&[
            ("HISTDUMP_DIR", "/env/dir"),
            ("HISTFILE", "/env/hist"),
            ("USER", "ada"),
        ]);
        let config = Config {
            dir: Some(PathBuf::from("/cfg/dir")),
            histfile: Some(PathBuf::from("/cfg/hist")),
            ..Config::default()
        };
        let overrides = Overrides {
            dir: Some(PathBuf::from("/cli/dir")),
            ..Overrides::default()
        };

        let settings = Settings::resolve(&overrides, &config, &env, Some(Path::new("/h"))).unwrap();
        assert_eq!(settings.base_dir, PathBuf::from("/cli/dir"));
        assert_eq!(settings.history_file, PathBuf::from("/env/hist"));
        assert_eq!(settings.user, "ada");

        let settings =
            Settings::resolve(&Overrides::default(), &config, &env_from(&[]), Some(Path::new("/h")))
                .unwrap();
        assert_eq!(settings.base_dir, PathBuf::from("/cfg/dir"));
        assert_eq!(settings.history_file, PathBuf::from("/cfg/hist"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let env = env_from(&[("HISTDUMP_DIR", ""), ("USER", " "), ("USERNAME", "bob")]);
        let settings = Settings::resolve(
            &Overrides::default(),
            &Config::default(),
            &env,
            Some(Path::new("/h")),
        )
        .unwrap();
        assert_eq!(settings.base_dir, PathBuf::from("/h/.histdump"));
        assert_eq!(settings.user, "bob");
    }

    #[test]
    fn tilde_in_config_expands_to_home() {
        let config = Config {
            dir: Some(PathBuf::from("~/notes/history")),
            ..Config::default()
        };
        let settings = Settings::resolve(
            &Overrides::default(),
            &config,
            &env_from(&[]),
            Some(Path::new("/home/ada")),
        )
        .unwrap();
        assert_eq!(settings.base_dir, PathBuf::from("/home/ada/notes/history"));
    }

    #[test]
    fn invalid_timezone_is_rejected() {
        let overrides = Overrides {
            timezone: Some("Mars/Olympus".to_string()),
            ..Overrides::default()
        };
        let err = Settings::resolve(&overrides, &Config::default(), &env_from(&[]), None)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTimezone { .. }));
    }

    #[test]
    fn explicit_config_must_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "dir = [not toml").unwrap();
        let path_str = path.to_string_lossy().to_string();
        let env = env_from(&[("HISTDUMP_CONFIG", path_str.as_str())]);
        let err = Config::load(&env).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "dir = \"/srv/hist\"\ndescription = \"ops box\"\ntimezone = \"UTC\"\ndebug = true\n",
        )
        .unwrap();
        let path_str = path.to_string_lossy().to_string();
        let env = env_from(&[("HISTDUMP_CONFIG", path_str.as_str())]);
        let config = Config::load(&env).unwrap();
        assert_eq!(config.dir, Some(PathBuf::from("/srv/hist")));
        assert_eq!(config.description.as_deref(), Some("ops box"));
        assert_eq!(config.timezone.as_deref(), Some("UTC"));
        assert!(config.debug);
    }
}
