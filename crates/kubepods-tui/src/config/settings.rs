//! Runtime settings merged from the config file and command line

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use kubepods_types::SortKey;

const DEFAULT_KUBECTL: &str = "kubectl";
const DEFAULT_SHELL: &str = "/bin/sh";
const DEFAULT_REFRESH_SECS: u64 = 10;

/// Contents of `config.toml`; every key is optional
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub kubectl: Option<String>,
    pub namespace: Option<String>,
    pub exec_command: Option<Vec<String>>,
    pub refresh_interval_secs: Option<u64>,
    pub sort: Option<SortKey>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid config file")
    }

    /// Load from `path`, or from the default location when `path` is None.
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config file");

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("In {}", path.display()))
    }
}

/// `$XDG_CONFIG_HOME/kubepods/config.toml` or the platform equivalent
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kubepods").join("config.toml"))
}

/// Values supplied on the command line, which win over the file
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub kubectl: Option<String>,
    pub namespace: Option<String>,
    pub exec_command: Option<Vec<String>>,
    pub refresh_interval_secs: Option<u64>,
    pub sort: Option<SortKey>,
}

/// Effective settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub kubectl: String,
    pub namespace: Option<String>,
    pub exec_command: Vec<String>,
    /// None disables periodic refresh
    pub refresh_interval: Option<Duration>,
    pub sort: SortKey,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(FileConfig::default(), Overrides::default())
    }
}

impl Settings {
    pub fn resolve(file: FileConfig, cli: Overrides) -> Self {
        let refresh_secs = cli
            .refresh_interval_secs
            .or(file.refresh_interval_secs)
            .unwrap_or(DEFAULT_REFRESH_SECS);

        let exec_command = cli
            .exec_command
            .or(file.exec_command)
            .filter(|cmd| !cmd.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_SHELL.to_string()]);

        Self {
            kubectl: cli
                .kubectl
                .or(file.kubectl)
                .unwrap_or_else(|| DEFAULT_KUBECTL.to_string()),
            namespace: cli.namespace.or(file.namespace),
            exec_command,
            refresh_interval: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
            sort: cli.sort.or(file.sort).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.kubectl, "kubectl");
        assert_eq!(s.namespace, None);
        assert_eq!(s.exec_command, vec!["/bin/sh"]);
        assert_eq!(s.refresh_interval, Some(Duration::from_secs(10)));
        assert_eq!(s.sort, SortKey::Name);
    }

    #[test]
    fn parses_file() {
        let file = FileConfig::parse(
            r#"
            kubectl = "/usr/local/bin/kubectl"
            namespace = "staging"
            exec_command = ["bash", "-l"]
            refresh_interval_secs = 0
            sort = "age"
            "#,
        )
        .unwrap();
        let s = Settings::resolve(file, Overrides::default());
        assert_eq!(s.kubectl, "/usr/local/bin/kubectl");
        assert_eq!(s.namespace.as_deref(), Some("staging"));
        assert_eq!(s.exec_command, vec!["bash", "-l"]);
        assert_eq!(s.refresh_interval, None);
        assert_eq!(s.sort, SortKey::Age);
    }

    #[test]
    fn cli_wins_over_file() {
        let file = FileConfig {
            namespace: Some("staging".into()),
            refresh_interval_secs: Some(30),
            ..Default::default()
        };
        let cli = Overrides {
            namespace: Some("prod".into()),
            refresh_interval_secs: Some(5),
            sort: Some(SortKey::Restarts),
            ..Default::default()
        };
        let s = Settings::resolve(file, cli);
        assert_eq!(s.namespace.as_deref(), Some("prod"));
        assert_eq!(s.refresh_interval, Some(Duration::from_secs(5)));
        assert_eq!(s.sort, SortKey::Restarts);
    }

    #[test]
    fn empty_exec_command_falls_back_to_shell() {
        let file = FileConfig {
            exec_command: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            Settings::resolve(file, Overrides::default()).exec_command,
            vec!["/bin/sh"]
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(FileConfig::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let missing = Path::new("/nonexistent/kubepods/config.toml");
        assert!(FileConfig::load(Some(missing)).is_err());
    }
}
