//! LeetSync — LeetCode 刷题记录同步 Notion 的同步引擎
//!
//! 核心流程：提交载荷 -> 元数据回填 -> HTML 转内容块 -> 页面查重 ->
//! 计数累加 -> 复习状态解析 -> 创建或更新 + 子块整体替换

pub mod commands;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use commands::{fetch_leetcode_meta, save_to_notion, MetaResponse, SyncResponse};
pub use config::SyncConfig;
pub use models::{
    CanonicalQuestion, ContentBlock, Difficulty, ProgressCounters, SubmissionPayload,
};
pub use services::{SyncEngine, SyncResult};
