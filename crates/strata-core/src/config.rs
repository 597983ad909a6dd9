use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-project settings, read from `strata.toml` in the working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// How parallel condensation edges are treated before path queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimplifyMode {
    /// Keep every parallel edge.
    #[default]
    None,
    /// Keep only the lightest edge between each pair.
    Min,
    /// Keep only the heaviest edge between each pair.
    Max,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Original node id used as the path source when none is given.
    #[serde(default)]
    pub source: Option<usize>,
    #[serde(default)]
    pub simplify: SimplifyMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_datasets_per_tier")]
    pub datasets_per_tier: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            out_dir: default_out_dir(),
            datasets_per_tier: default_datasets_per_tier(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `human` or `json`; unset means human.
    #[serde(default)]
    pub format: Option<String>,
}

/// Per-user defaults, read from `<config dir>/strata/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: OutputConfig,
}

/// Project and user config merged; project settings win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

const fn default_seed() -> u64 {
    42
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("data")
}

const fn default_datasets_per_tier() -> usize {
    3
}

/// Load `strata.toml` from `project_root`, or defaults if it is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join("strata.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user config, or defaults if there is no config directory or file.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("strata/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Merge project and user config, resolving the output format.
///
/// # Errors
///
/// Propagates load errors from either config file.
pub fn resolve_config(project_root: &Path) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    Ok(merge(project, user))
}

fn merge(project: ProjectConfig, user: UserConfig) -> EffectiveConfig {
    let resolved_output = project
        .output
        .format
        .clone()
        .or_else(|| user.output.format.clone())
        .unwrap_or_else(|| "human".to_string());

    EffectiveConfig {
        project,
        user,
        resolved_output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_project_config(dir.path()).expect("defaults");
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.generate.seed, 42);
        assert_eq!(config.generate.out_dir, PathBuf::from("data"));
        assert_eq!(config.analysis.simplify, SimplifyMode::None);
    }

    #[test]
    fn partial_project_config_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("strata.toml"),
            "[analysis]\nsource = 3\nsimplify = \"max\"\n\n[generate]\nseed = 7\n",
        )
        .expect("write config");

        let config = load_project_config(dir.path()).expect("parse config");
        assert_eq!(config.analysis.source, Some(3));
        assert_eq!(config.analysis.simplify, SimplifyMode::Max);
        assert_eq!(config.generate.seed, 7);
        assert_eq!(config.generate.datasets_per_tier, 3);
    }

    #[test]
    fn invalid_project_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("strata.toml"), "[analysis\nsource = ").expect("write");

        let err = load_project_config(dir.path()).expect_err("bad toml");
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn project_output_format_wins_over_user() {
        let project = ProjectConfig {
            output: OutputConfig {
                format: Some("json".to_string()),
            },
            ..ProjectConfig::default()
        };
        let user = UserConfig {
            output: OutputConfig {
                format: Some("human".to_string()),
            },
        };
        assert_eq!(merge(project, user).resolved_output, "json");
    }

    #[test]
    fn output_format_defaults_to_human() {
        let merged = merge(ProjectConfig::default(), UserConfig::default());
        assert_eq!(merged.resolved_output, "human");
    }
}
