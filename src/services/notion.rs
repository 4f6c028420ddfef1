//! Notion 远端存储客户端
//! 页面查重、schema 读取、创建/更新属性、子块的分页删除与分批追加
//!
//! 所有请求走重试客户端；非 2xx 不抛错，由各方法解读状态码。

use crate::models::ProgressCounters;
use crate::services::http::{ApiClient, RetryPolicy};
use anyhow::{anyhow, Result};
use reqwest::Method;
use serde_json::{json, Value};

const NOTION_API: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// 子块列举的分页大小
const CHILDREN_PAGE_SIZE: usize = 100;
/// 单次追加请求的块数上限
const APPEND_CHUNK_SIZE: usize = 90;

/// 计数器所在的属性名
const COUNTERS_PROPERTY: &str = "Times/Correct";
/// 复习状态所在的属性名
const REVIEW_PROPERTY: &str = "review";

/// 查重结果
#[derive(Debug, Clone)]
pub struct FoundPage {
    pub exists: bool,
    pub page: Option<Value>,
}

impl FoundPage {
    fn none() -> Self {
        Self { exists: false, page: None }
    }
}

/// Notion API 客户端
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: ApiClient,
    token: String,
}

impl NotionClient {
    pub fn new(http: ApiClient, token: impl Into<String>) -> Self {
        Self { http, token: token.into() }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .inner()
            .request(method, format!("{}{}", NOTION_API, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    /// 查找已有页面：先按 Problem 题号，再按 Link 链接，命中即返回
    /// 两种策略的结果不合并
    pub async fn find_existing_page(
        &self,
        database_id: &str,
        problem_id: Option<i64>,
        url: Option<&str>,
    ) -> Result<FoundPage> {
        if let Some(id) = problem_id {
            let filter = json!({ "property": "Problem", "number": { "equals": id } });
            if let Some(page) = self.query_first(database_id, filter).await? {
                return Ok(FoundPage { exists: true, page: Some(page) });
            }
        }
        if let Some(link) = url {
            if !link.is_empty() {
                let filter = json!({ "property": "Link", "url": { "equals": link } });
                if let Some(page) = self.query_first(database_id, filter).await? {
                    return Ok(FoundPage { exists: true, page: Some(page) });
                }
            }
        }
        Ok(FoundPage::none())
    }

    /// 按过滤条件查询数据库，取首条结果
    async fn query_first(&self, database_id: &str, filter: Value) -> Result<Option<Value>> {
        let req = self
            .request(Method::POST, &format!("/databases/{}/query", database_id))
            .json(&json!({ "filter": filter, "page_size": 1 }));
        let resp = self.http.send(req, &RetryPolicy::idempotent()).await?;
        if !resp.status().is_success() {
            // 查询失败按未命中处理，让后续策略或创建路径继续
            log::warn!("数据库查询失败: {}", resp.status());
            return Ok(None);
        }
        let data: Value = resp.json().await?;
        Ok(data["results"].as_array().and_then(|r| r.first()).cloned())
    }

    /// 读取 review 状态属性允许的选项名列表
    pub async fn review_status_options(&self, database_id: &str) -> Result<Vec<String>> {
        let req = self.request(Method::GET, &format!("/databases/{}", database_id));
        let resp = self.http.send(req, &RetryPolicy::idempotent()).await?;
        if !resp.status().is_success() {
            log::warn!("schema 读取失败: {}", resp.status());
            return Ok(Vec::new());
        }
        let data: Value = resp.json().await?;
        let options = data["properties"][REVIEW_PROPERTY]["status"]["options"]
            .as_array()
            .map(|opts| {
                opts.iter()
                    .filter_map(|o| o["name"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(options)
    }

    /// 创建页面并附初始内容；失败时错误携带远端原始响应体
    pub async fn create_page(
        &self,
        database_id: &str,
        properties: Value,
        children: &[Value],
    ) -> Result<Value> {
        let req = self.request(Method::POST, "/pages").json(&json!({
            "parent": { "database_id": database_id },
            "properties": properties,
            "children": children,
        }));
        let resp = self.http.send(req, &RetryPolicy::mutation()).await?;
        let status = resp.status();
        let data: Value = resp.json().await?;
        if !status.is_success() {
            return Err(anyhow!("Notion 创建页面失败 ({}): {}", status, data));
        }
        Ok(data)
    }

    /// 更新页面属性；失败时错误携带远端原始响应体
    pub async fn update_page_properties(&self, page_id: &str, properties: Value) -> Result<Value> {
        let req = self
            .request(Method::PATCH, &format!("/pages/{}", page_id))
            .json(&json!({ "properties": properties }));
        let resp = self.http.send(req, &RetryPolicy::mutation()).await?;
        let status = resp.status();
        let data: Value = resp.json().await?;
        if !status.is_success() {
            return Err(anyhow!("Notion 更新页面失败 ({}): {}", status, data));
        }
        Ok(data)
    }

    /// 分页列举并归档页面的全部子块
    /// 终止条件：某页无结果，或远端报告没有更多页
    pub async fn delete_all_children(&self, page_id: &str) -> Result<()> {
        let mut cursor: Option<String> = None;
        loop {
            let mut path = format!(
                "/blocks/{}/children?page_size={}",
                page_id, CHILDREN_PAGE_SIZE
            );
            if let Some(c) = &cursor {
                path.push_str(&format!("&start_cursor={}", c));
            }
            let req = self.request(Method::GET, &path);
            let resp = self.http.send(req, &RetryPolicy::idempotent()).await?;
            if !resp.status().is_success() {
                log::warn!("子块列举失败: {}", resp.status());
                return Ok(());
            }
            let data: Value = resp.json().await?;
            let children = data["results"].as_array().cloned().unwrap_or_default();
            if children.is_empty() {
                return Ok(());
            }
            for block in &children {
                if let Some(id) = block["id"].as_str() {
                    self.archive_block(id).await?;
                }
            }
            if !data["has_more"].as_bool().unwrap_or(false) {
                return Ok(());
            }
            cursor = data["next_cursor"].as_str().map(str::to_string);
        }
    }

    /// 归档单个块（Notion 的删除语义）
    async fn archive_block(&self, block_id: &str) -> Result<()> {
        let req = self
            .request(Method::PATCH, &format!("/blocks/{}", block_id))
            .json(&json!({ "archived": true }));
        let resp = self.http.send(req, &RetryPolicy::mutation()).await?;
        if !resp.status().is_success() {
            // 循环内尽力而为，单块失败不中断
            log::warn!("归档块 {} 失败: {}", block_id, resp.status());
        }
        Ok(())
    }

    /// 按每请求块数上限分批追加子块
    pub async fn append_children(&self, page_id: &str, blocks: &[Value]) -> Result<()> {
        for chunk in blocks.chunks(APPEND_CHUNK_SIZE) {
            let req = self
                .request(Method::PATCH, &format!("/blocks/{}/children", page_id))
                .json(&json!({ "children": chunk }));
            let resp = self.http.send(req, &RetryPolicy::mutation()).await?;
            if !resp.status().is_success() {
                log::warn!("追加子块失败: {}", resp.status());
            }
        }
        Ok(())
    }
}

/// 从已有页面读取刷题计数器，缺失或格式错误按 0/0
pub fn parse_times_correct(page: &Value) -> ProgressCounters {
    let prop = &page["properties"][COUNTERS_PROPERTY];
    if prop["type"] == "rich_text" {
        if let Some(text) = prop["rich_text"][0]["plain_text"].as_str() {
            return ProgressCounters::parse(text);
        }
    }
    ProgressCounters::default()
}

/// 从创建/更新响应得到可访问的页面链接
/// 优先远端给出的 url，否则用 id 合成
pub fn page_url_from_response(data: &Value) -> String {
    if let Some(url) = data["url"].as_str() {
        if !url.is_empty() {
            return url.to_string();
        }
    }
    if let Some(id) = data["id"].as_str() {
        return format!("https://www.notion.so/{}", id.replace('-', ""));
    }
    String::new()
}
