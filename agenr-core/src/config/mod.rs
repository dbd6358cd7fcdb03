//! Layered configuration: TOML file defaults, overridden by environment
//! variables, built from `#[serde(default)]` sectioned config structs
//! (`ConsolidationConfig`, `DbConfig`, ...).

mod defaults;

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{AgenrError, AgenrResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgenrConfig {
    pub db: DbConfig,
    pub project: ProjectConfig,
    pub recall: RecallConfig,
    pub consolidation: ConsolidationConfig,
    pub session: SessionConfig,
}

impl Default for AgenrConfig {
    fn default() -> Self {
        Self {
            db: DbConfig::default(),
            project: ProjectConfig::default(),
            recall: RecallConfig::default(),
            consolidation: ConsolidationConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub path: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: defaults::default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub current: Option<String>,
    pub dependencies: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            current: None,
            dependencies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub weight_vector: f64,
    pub weight_keyword: f64,
    pub weight_recency: f64,
    pub weight_importance: f64,
    pub non_core_limit: usize,
    pub recency_half_life_days: f64,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            weight_vector: defaults::DEFAULT_WEIGHT_VECTOR,
            weight_keyword: defaults::DEFAULT_WEIGHT_KEYWORD,
            weight_recency: defaults::DEFAULT_WEIGHT_RECENCY,
            weight_importance: defaults::DEFAULT_WEIGHT_IMPORTANCE,
            non_core_limit: crate::constants::DEFAULT_NON_CORE_LIMIT,
            recency_half_life_days: defaults::DEFAULT_RECENCY_HALF_LIFE_DAYS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    pub temporary_base_ttl_days: f64,
    pub dedup_similarity_threshold: f64,
    pub cluster_min_size: usize,
    pub cluster_neighbor_limit: usize,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            temporary_base_ttl_days: defaults::DEFAULT_TEMPORARY_TTL_DAYS,
            dedup_similarity_threshold: defaults::DEFAULT_DEDUP_THRESHOLD,
            cluster_min_size: defaults::DEFAULT_CLUSTER_MIN_SIZE,
            cluster_neighbor_limit: defaults::DEFAULT_CLUSTER_NEIGHBOR_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub buffer_cap: usize,
    pub message_truncate: usize,
    pub jaccard_threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_cap: crate::constants::MID_SESSION_BUFFER_CAP,
            message_truncate: crate::constants::MID_SESSION_MESSAGE_TRUNCATE,
            jaccard_threshold: crate::constants::MID_SESSION_JACCARD_THRESHOLD,
        }
    }
}

impl AgenrConfig {
    /// Parse a config from a TOML string, ignoring environment overrides.
    pub fn from_toml(text: &str) -> AgenrResult<Self> {
        toml::from_str(text).map_err(|e| AgenrError::Config(e.to_string()))
    }

    /// Load the config from an optional file path, falling back to
    /// defaults when absent, then apply environment variable overrides.
    pub fn load(path: Option<&Path>) -> AgenrResult<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let text = std::fs::read_to_string(p)?;
                Self::from_toml(&text)?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var("AGENR_DB_PATH") {
            self.db.path = path;
        }
        if let Ok(project) = env::var("AGENR_PROJECT_DIR") {
            self.project.current = Some(project);
        }
    }
}
