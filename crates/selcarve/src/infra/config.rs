//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".selcarve/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub output: Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Cap on selections carved per invocation.
    #[serde(default = "Defaults::default_max_selections")]
    pub max_selections: usize,
    /// Extension appended to suggested filenames.
    #[serde(default = "Defaults::default_extension")]
    pub extension: String,
    /// Character budget for status previews.
    #[serde(default = "Defaults::default_preview_length")]
    pub preview_length: usize,
}

impl Defaults {
    fn default_max_selections() -> usize {
        100
    }

    fn default_extension() -> String {
        "txt".into()
    }

    fn default_preview_length() -> usize {
        30
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            max_selections: Self::default_max_selections(),
            extension: Self::default_extension(),
            preview_length: Self::default_preview_length(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    #[serde(default)]
    directory: Option<String>,
    #[serde(default)]
    uniquify: Option<bool>,
}

impl Output {
    fn default_uniquify() -> bool {
        true
    }

    /// Directory carved files are written into when the headless host saves.
    pub fn directory(&self) -> Option<PathBuf> {
        self.directory.as_ref().map(PathBuf::from)
    }

    /// Whether colliding save targets get a numeric suffix instead of being
    /// overwritten.
    pub fn uniquify(&self) -> bool {
        self.uniquify.unwrap_or_else(Self::default_uniquify)
    }
}

impl Default for Output {
    fn default() -> Self {
        Self {
            directory: None,
            uniquify: Some(Self::default_uniquify()),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    max_selections: Option<usize>,
    extension: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            max_selections: env::var("SELCARVE_MAX_SELECTIONS")
                .ok()
                .and_then(|value| value.parse().ok()),
            extension: env::var("SELCARVE_EXTENSION").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(max_selections: usize, extension: &str) -> Self {
        Self {
            max_selections: Some(max_selections),
            extension: Some(extension.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            output: merge_output(self.output, other.output),
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        max_selections: if overlay.max_selections != Defaults::default_max_selections() {
            overlay.max_selections
        } else {
            base.max_selections
        },
        extension: if overlay.extension != Defaults::default_extension() {
            overlay.extension
        } else {
            base.extension
        },
        preview_length: if overlay.preview_length != Defaults::default_preview_length() {
            overlay.preview_length
        } else {
            base.preview_length
        },
    }
}

fn merge_output(mut base: Output, overlay: Output) -> Output {
    if let Some(value) = overlay.directory {
        base.directory = Some(value);
    }
    if let Some(value) = overlay.uniquify {
        base.uniquify = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("selcarve/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(max_selections) = env.max_selections {
        config.defaults.max_selections = max_selections;
    }
    if let Some(extension) = env.extension {
        config.defaults.extension = extension;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.defaults.max_selections, 100);
        assert_eq!(config.defaults.extension, "txt");
        assert_eq!(config.defaults.preview_length, 30);
        assert!(config.output.directory().is_none());
        assert!(config.output.uniquify());
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[defaults]
max_selections = 10
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".selcarve"))?;
        fs::create_dir_all(workspace_dir.join(".git"))?;
        fs::write(
            workspace_dir.join(".selcarve/config.toml"),
            r#"
[defaults]
extension = "md"
[output]
directory = "carved"
uniquify = false
"#,
        )?;

        let global_path = Some(global);
        let workspace_path = Some(workspace_dir.join(".selcarve/config.toml"));

        let config =
            Config::load_with_layers(global_path, workspace_path, EnvOverrides::default())?;

        assert_eq!(config.defaults.max_selections, 10);
        assert_eq!(config.defaults.extension, "md");
        assert_eq!(config.output.directory(), Some(PathBuf::from("carved")));
        assert!(!config.output.uniquify());

        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests(7, "rs");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.defaults.max_selections, 7);
        assert_eq!(config.defaults.extension, "rs");
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
