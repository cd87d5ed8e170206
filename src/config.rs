use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{Catalog, Tool};
use crate::slash::{NamePrefixScorer, Scorer, UniformScorer};

pub const DEFAULT_PLACEHOLDER: &str = "What can I do for you today?";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("tool #{index} has an empty name")]
    EmptyToolName { index: usize },
    #[error("tool '{name}' is defined more than once")]
    DuplicateTool { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ranking {
    #[default]
    Uniform,
    Prefix,
}

impl Ranking {
    pub fn scorer(self) -> Box<dyn Scorer> {
        match self {
            Ranking::Uniform => Box::new(UniformScorer),
            Ranking::Prefix => Box::new(NamePrefixScorer),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposerConfig {
    pub placeholder: String,
    pub ranking: Ranking,
    pub catalog: Catalog,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            ranking: Ranking::Uniform,
            catalog: Catalog::sample(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComposerToml {
    placeholder: Option<String>,
    #[serde(default)]
    ranking: Ranking,
    tools: Option<Vec<Tool>>,
}

impl ComposerConfig {
    /// A missing file yields the defaults; an unreadable or invalid one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no composer config found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::from_toml_str(&contents).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(
            path = %path.display(),
            tools = config.catalog.len(),
            "loaded composer config"
        );
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let parsed: ComposerToml = toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        let catalog = match parsed.tools {
            Some(tools) => validate_tools(tools)?,
            None => Catalog::sample(),
        };
        if catalog.is_empty() {
            warn!("composer config defines an empty tool catalog");
        }
        Ok(Self {
            placeholder: parsed
                .placeholder
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
            ranking: parsed.ranking,
            catalog,
        })
    }
}

fn validate_tools(tools: Vec<Tool>) -> Result<Catalog, ConfigError> {
    let mut seen = HashSet::new();
    for (index, tool) in tools.iter().enumerate() {
        if tool.name.trim().is_empty() {
            return Err(ConfigError::EmptyToolName { index });
        }
        if !seen.insert(tool.name.as_str()) {
            return Err(ConfigError::DuplicateTool {
                name: tool.name.clone(),
            });
        }
    }
    Ok(Catalog::new(tools))
}
