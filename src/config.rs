use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 约简阶段的时间预算（秒）。
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ReductionConfig {
    /// 构造（及求解）状态方程 LP 的预算。
    #[serde(default = "default_lp_timeout")]
    pub lp_timeout: u32,
    /// 建立在 LP 之上的 potency 启发式的预算。
    #[serde(default = "default_potency_timeout")]
    pub potency_timeout: u32,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            lp_timeout: default_lp_timeout(),
            potency_timeout: default_potency_timeout(),
        }
    }
}

impl ReductionConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse reduction config")
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: ReductionConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }
}

fn default_lp_timeout() -> u32 {
    10
}

fn default_potency_timeout() -> u32 {
    0
}
