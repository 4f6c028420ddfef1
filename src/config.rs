//! 同步配置模块
//! Notion 凭据由调用方环境提供，缺失视为前置条件失败

use anyhow::{bail, Result};

/// 环境变量名
const ENV_TOKEN: &str = "NOTION_TOKEN";
const ENV_DATABASE_ID: &str = "NOTION_DATABASE_ID";

/// 同步所需的 Notion 凭据
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    pub token: String,
    pub database_id: String,
}

impl SyncConfig {
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            database_id: database_id.into(),
        }
    }

    /// 从环境变量读取配置，缺失项留空由 validate 检查
    pub fn from_env() -> Self {
        Self {
            token: std::env::var(ENV_TOKEN).unwrap_or_default(),
            database_id: std::env::var(ENV_DATABASE_ID).unwrap_or_default(),
        }
    }

    /// 在任何网络调用前检查凭据是否齐全
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() || self.database_id.trim().is_empty() {
            bail!("Notion Token/Database ID 未设置");
        }
        Ok(())
    }
}
