/*!
# Toolchain Configuration

Where the TChecker binaries live and how each tool is invoked.

Layers, lowest priority first:

1. built-in defaults
2. user file `~/.config/tchecker-lsp/config.toml`
3. workspace `tchecker.toml` (or an explicit `--config` file)
4. `TCHECKER_*` environment variables
5. LSP settings (section `tchecker`)

Nothing is validated here: a wrong path only shows up when a tool is run.

```toml
path = "/opt/tchecker/bin/"
tck-syntax = "tck-syntax -c"
tck-simulate = "tck-simulate -i"
check-on-save = true
```
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the workspace-level configuration file
pub const WORKSPACE_CONFIG_FILE: &str = "tchecker.toml";

/// LSP settings section
pub const SETTINGS_SECTION: &str = "tchecker";

/// Settings section of the `tchecker-vscode` extension
pub const LEGACY_SETTINGS_SECTION: &str = "tchecker-vscode";

/// The external tools the server knows how to launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Syntax,
    Simulate,
    Reach,
    Liveness,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Syntax => write!(f, "tck-syntax"),
            Tool::Simulate => write!(f, "tck-simulate"),
            Tool::Reach => write!(f, "tck-reach"),
            Tool::Liveness => write!(f, "tck-liveness"),
        }
    }
}

/// Effective toolchain configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainConfig {
    /// Prefix prepended verbatim to every command (usually ends with `/`)
    pub path: String,
    #[serde(rename = "tck-syntax")]
    pub syntax_command: String,
    #[serde(rename = "tck-simulate")]
    pub simulate_command: String,
    #[serde(rename = "tck-reach")]
    pub reach_command: String,
    #[serde(rename = "tck-liveness")]
    pub liveness_command: String,
    /// Run the syntax check whenever a `.tck` document is saved
    pub check_on_save: bool,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            syntax_command: "tck-syntax -c".to_string(),
            simulate_command: "tck-simulate -i".to_string(),
            reach_command: "tck-reach -a reach".to_string(),
            liveness_command: "tck-liveness -a ndfs".to_string(),
            check_on_save: false,
        }
    }
}

impl ToolchainConfig {
    /// Builds the layered configuration.
    ///
    /// `explicit` must exist when given; the user and workspace files are
    /// optional.
    pub fn load(explicit: Option<&Path>, workspace: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_file) = user_config_path().filter(|p| p.is_file()) {
            tracing::debug!("Loading user config {}", user_file.display());
            config.apply(ToolchainOverrides::load_from_file(&user_file)?);
        }

        match explicit {
            Some(path) => config.apply(ToolchainOverrides::load_from_file(path)?),
            None => {
                if let Some(file) = workspace
                    .map(|dir| dir.join(WORKSPACE_CONFIG_FILE))
                    .filter(|p| p.is_file())
                {
                    tracing::debug!("Loading workspace config {}", file.display());
                    config.apply(ToolchainOverrides::load_from_file(&file)?);
                }
            }
        }

        config.apply(ToolchainOverrides::from_env());
        Ok(config)
    }

    /// Overrides every field that `overrides` sets.
    pub fn apply(&mut self, overrides: ToolchainOverrides) {
        let ToolchainOverrides {
            path,
            syntax_command,
            simulate_command,
            reach_command,
            liveness_command,
            check_on_save,
        } = overrides;

        if let Some(v) = path {
            self.path = v;
        }
        if let Some(v) = syntax_command {
            self.syntax_command = v;
        }
        if let Some(v) = simulate_command {
            self.simulate_command = v;
        }
        if let Some(v) = reach_command {
            self.reach_command = v;
        }
        if let Some(v) = liveness_command {
            self.liveness_command = v;
        }
        if let Some(v) = check_on_save {
            self.check_on_save = v;
        }
    }

    /// `<path><command>` for `tool`, without the file argument.
    pub fn command_for(&self, tool: Tool) -> String {
        let command = match tool {
            Tool::Syntax => &self.syntax_command,
            Tool::Simulate => &self.simulate_command,
            Tool::Reach => &self.reach_command,
            Tool::Liveness => &self.liveness_command,
        };
        format!("{}{}", self.path, command)
    }

    /// Serializes the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize toolchain config to TOML")
    }
}

/// A partial configuration layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainOverrides {
    pub path: Option<String>,
    #[serde(rename = "tck-syntax", alias = "syntax")]
    pub syntax_command: Option<String>,
    #[serde(rename = "tck-simulate", alias = "simulate")]
    pub simulate_command: Option<String>,
    #[serde(rename = "tck-reach", alias = "reach")]
    pub reach_command: Option<String>,
    #[serde(rename = "tck-liveness", alias = "liveness")]
    pub liveness_command: Option<String>,
    #[serde(alias = "checkOnSave")]
    pub check_on_save: Option<bool>,
}

impl ToolchainOverrides {
    /// Load a layer from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read toolchain config from {}", path.as_ref().display())
        })?;

        toml::from_str(&content).with_context(|| {
            format!("Failed to parse TOML config from {}", path.as_ref().display())
        })
    }

    /// Layer built from `TCHECKER_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            path: lookup("TCHECKER_PATH"),
            syntax_command: lookup("TCHECKER_SYNTAX"),
            simulate_command: lookup("TCHECKER_SIMULATE"),
            reach_command: lookup("TCHECKER_REACH"),
            liveness_command: lookup("TCHECKER_LIVENESS"),
            check_on_save: lookup("TCHECKER_CHECK_ON_SAVE").map(|v| matches!(v.as_str(), "1" | "true" | "yes")),
        }
    }

    /// Layer built from LSP settings.
    ///
    /// Accepts the section object itself or an object wrapping it under
    /// `tchecker` / `tchecker-vscode`. `null` yields an empty layer.
    pub fn from_settings(value: &serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let section = value
            .get(SETTINGS_SECTION)
            .or_else(|| value.get(LEGACY_SETTINGS_SECTION))
            .unwrap_or(value);
        serde_json::from_value(section.clone()).context("Invalid tchecker settings")
    }
}

/// `~/.config/tchecker-lsp/config.toml` (platform config dir)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tchecker-lsp").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_and_command_for() {
        let mut config = ToolchainConfig::default();
        assert_eq!(config.command_for(Tool::Syntax), "tck-syntax -c");
        config.path = "/opt/tchecker/bin/".to_string();
        assert_eq!(config.command_for(Tool::Simulate), "/opt/tchecker/bin/tck-simulate -i");
        assert_eq!(config.command_for(Tool::Liveness), "/opt/tchecker/bin/tck-liveness -a ndfs");
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join(WORKSPACE_CONFIG_FILE);
        std::fs::write(&file, "path = \"/usr/local/bin/\"\ntck-syntax = \"tck-syntax --check\"\n").unwrap();

        let mut config = ToolchainConfig::default();
        config.apply(ToolchainOverrides::load_from_file(&file).unwrap());

        assert_eq!(config.path, "/usr/local/bin/");
        assert_eq!(config.syntax_command, "tck-syntax --check");
        assert_eq!(config.simulate_command, "tck-simulate -i");
    }

    #[test]
    fn test_invalid_toml_is_reported_with_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("broken.toml");
        std::fs::write(&file, "path = [").unwrap();
        let err = ToolchainOverrides::load_from_file(&file).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert!(ToolchainConfig::load(Some(&missing), None).is_err());
    }

    #[test]
    fn test_env_lookup() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("TCHECKER_PATH", "/tc/"), ("TCHECKER_CHECK_ON_SAVE", "true")]);
        let layer = ToolchainOverrides::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(layer.path.as_deref(), Some("/tc/"));
        assert_eq!(layer.check_on_save, Some(true));
        assert_eq!(layer.syntax_command, None);
    }

    #[test]
    fn test_settings_sections() {
        let wrapped = json!({ "tchecker": { "path": "/a/", "checkOnSave": true } });
        let layer = ToolchainOverrides::from_settings(&wrapped).unwrap();
        assert_eq!(layer.path.as_deref(), Some("/a/"));
        assert_eq!(layer.check_on_save, Some(true));

        let legacy = json!({ "tchecker-vscode": { "tck-simulate": "tck-simulate -i -s" } });
        let layer = ToolchainOverrides::from_settings(&legacy).unwrap();
        assert_eq!(layer.simulate_command.as_deref(), Some("tck-simulate -i -s"));

        let bare = json!({ "tck-reach": "tck-reach -a covreach" });
        let layer = ToolchainOverrides::from_settings(&bare).unwrap();
        assert_eq!(layer.reach_command.as_deref(), Some("tck-reach -a covreach"));

        assert_eq!(
            ToolchainOverrides::from_settings(&serde_json::Value::Null).unwrap(),
            ToolchainOverrides::default()
        );
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = ToolchainConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("tck-syntax = \"tck-syntax -c\""));
        let parsed: ToolchainConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
