//! 同步相关命令
//! 入口一律返回带 ok 标志的 DTO，错误以可序列化描述传出，不向上抛异常

use crate::config::SyncConfig;
use crate::models::{Difficulty, SubmissionPayload};
use crate::services::http::ApiClient;
use crate::services::leetcode::fetch_question;
use crate::services::sync::SyncEngine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 同步结果 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notion: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

impl SyncResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            notion: None,
            page_url: None,
        }
    }
}

/// 题目元数据 DTO（预填/预览用）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemMetaDto {
    pub problem_id: Option<i64>,
    pub title: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub topics: Vec<String>,
}

/// 元数据查询结果 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ProblemMetaDto>,
}

impl MetaResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            data: None,
        }
    }
}

/// 将一条提交同步到 Notion
/// 凭据缺失在任何网络调用前快速失败
pub async fn save_to_notion(config: &SyncConfig, payload: SubmissionPayload) -> SyncResponse {
    if let Err(e) = config.validate() {
        return SyncResponse::failure(e.to_string());
    }
    let engine = SyncEngine::new(config.clone());
    match engine.sync(payload).await {
        Ok(result) => SyncResponse {
            ok: true,
            error: None,
            notion: Some(result.page),
            page_url: Some(result.page_url),
        },
        Err(e) => {
            log::error!("同步失败: {:#}", e);
            SyncResponse::failure(format!("{:#}", e))
        }
    }
}

/// 只读查询题目元数据，不做任何远端写入
pub async fn fetch_leetcode_meta(slug: &str) -> MetaResponse {
    let slug = slug.trim();
    if slug.is_empty() {
        return MetaResponse::failure("missing slug");
    }
    let http = ApiClient::new();
    match fetch_question(&http, slug).await {
        Ok(Some(q)) => MetaResponse {
            ok: true,
            error: None,
            data: Some(ProblemMetaDto {
                problem_id: q.problem_id,
                title: q.title,
                difficulty: q.difficulty,
                topics: q.topics,
            }),
        },
        Ok(None) => MetaResponse::failure("no question"),
        Err(e) => MetaResponse::failure(format!("{:#}", e)),
    }
}
