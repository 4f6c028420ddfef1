//! 同步编排引擎
//! 元数据回填 -> 内容块构建 -> 页面查重 -> 计数累加 -> 复习状态解析 -> 远端写入

use crate::config::SyncConfig;
use crate::models::{ContentBlock, ProgressCounters, SubmissionPayload};
use crate::services::blocks::html_to_blocks;
use crate::services::http::ApiClient;
use crate::services::leetcode::fetch_question;
use crate::services::notion::{
    page_url_from_response, parse_times_correct, NotionClient,
};
use crate::services::review::{format_date, next_review_date, resolve_status};
use crate::utils::{normalize_language, split_chunks, CODE_CHUNK_SIZE};
use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use serde_json::{json, Value};

/// 描述 + 代码合并后的总块数上限
pub const MAX_CHILDREN_BLOCKS: usize = 95;

/// 标题缺省值
const DEFAULT_TITLE: &str = "LeetCode Problem";

/// 同步结果
#[derive(Debug, Clone)]
pub struct SyncResult {
    pub page: Value,
    pub page_url: String,
    pub created: bool,
}

/// 同步引擎：持有配置与客户端，单次 sync 调用完成一条提交的落库
#[derive(Debug, Clone)]
pub struct SyncEngine {
    http: ApiClient,
    notion: NotionClient,
    config: SyncConfig,
}

impl SyncEngine {
    pub fn new(config: SyncConfig) -> Self {
        let http = ApiClient::new();
        let notion = NotionClient::new(http.clone(), &config.token);
        Self { http, notion, config }
    }

    /// 执行一次提交同步，返回落库页面与可访问链接
    pub async fn sync(&self, mut payload: SubmissionPayload) -> Result<SyncResult> {
        self.config.validate()?;
        let today = Local::now().date_naive();

        // 1. 按 slug 回填权威元数据；失败不阻断同步
        let desc_blocks = self.enrich_payload(&mut payload).await;

        // 2-3. 描述 + 代码合并为子块文档，统一截断
        let mut children = desc_blocks;
        children.extend(build_code_blocks(&payload));
        children.truncate(MAX_CHILDREN_BLOCKS);
        let children_json: Vec<Value> = children.iter().map(ContentBlock::to_notion_json).collect();

        // 4. 查重：题号优先，链接其次
        let found = self
            .notion
            .find_existing_page(
                &self.config.database_id,
                payload.problem_id,
                payload.url.as_deref(),
            )
            .await?;

        // 5. 计数累加：已有页面先读旧值
        let mut counters = found
            .page
            .as_ref()
            .map(parse_times_correct)
            .unwrap_or_default();
        counters.bump(payload.correct);

        // 6. 复习状态按实际 schema 校验，并推算下次复习日期
        let options = self
            .notion
            .review_status_options(&self.config.database_id)
            .await?;
        let review = resolve_status(payload.review_status.as_deref(), &options);
        let next_date = review.as_deref().and_then(|l| next_review_date(l, today));

        // 7. 组装属性集
        let properties = build_properties(&payload, review.as_deref(), today, next_date, &counters);

        // 8. 不存在则创建
        if !found.exists {
            log::info!(
                "创建页面: {} (problem_id={:?})",
                payload.title.as_deref().unwrap_or(DEFAULT_TITLE),
                payload.problem_id
            );
            let data = self
                .notion
                .create_page(&self.config.database_id, properties, &children_json)
                .await?;
            let page_url = page_url_from_response(&data);
            return Ok(SyncResult { page: data, page_url, created: true });
        }

        // 9. 存在则更新属性，再整体替换子块
        let page_id = found
            .page
            .as_ref()
            .and_then(|p| p["id"].as_str())
            .ok_or_else(|| anyhow!("查重结果缺少页面 id"))?
            .to_string();
        log::info!("更新页面 {} (第 {} 次提交)", page_id, counters.attempts);
        let data = self.notion.update_page_properties(&page_id, properties).await?;
        self.notion.delete_all_children(&page_id).await?;
        if !children_json.is_empty() {
            self.notion.append_children(&page_id, &children_json).await?;
        }
        let page_url = page_url_from_response(&data);
        Ok(SyncResult { page: data, page_url, created: false })
    }

    /// 按 slug 拉取元数据回填缺省字段，并转换描述 HTML
    /// 任何失败只记日志，载荷保持原样
    async fn enrich_payload(&self, payload: &mut SubmissionPayload) -> Vec<ContentBlock> {
        let Some(slug) = payload.slug.clone() else {
            return Vec::new();
        };
        match fetch_question(&self.http, &slug).await {
            Ok(Some(question)) => {
                if payload.problem_id.is_none() {
                    payload.problem_id = question.problem_id;
                }
                if payload.title.is_none() {
                    payload.title = question.title.clone();
                }
                if payload.difficulty.is_none() {
                    payload.difficulty = question.difficulty;
                }
                if payload.topics.is_empty() {
                    payload.topics = question.topics.clone();
                }
                question
                    .description_html
                    .as_deref()
                    .map(html_to_blocks)
                    .unwrap_or_default()
            }
            Ok(None) => {
                log::warn!("slug {} 未查到题目，跳过回填", slug);
                Vec::new()
            }
            Err(e) => {
                log::warn!("元数据拉取失败，继续同步: {}", e);
                Vec::new()
            }
        }
    }
}

/// 代码部分的子块：Code 标题 + 按固定字符数切片的代码块
pub fn build_code_blocks(payload: &SubmissionPayload) -> Vec<ContentBlock> {
    let Some(code) = payload.code.as_deref() else {
        return Vec::new();
    };
    if code.is_empty() {
        return Vec::new();
    }
    let language = normalize_language(payload.language.as_deref());
    let mut blocks = vec![ContentBlock::Heading {
        level: 2,
        text: "Code".to_string(),
    }];
    for chunk in split_chunks(code, CODE_CHUNK_SIZE) {
        blocks.push(ContentBlock::Code {
            language: language.clone(),
            text: chunk,
        });
    }
    blocks
}

/// 组装 Notion 页面属性集
/// 未知字段整项省略；review 与 Next Date 只在解析出值时包含
pub fn build_properties(
    payload: &SubmissionPayload,
    review: Option<&str>,
    today: NaiveDate,
    next_date: Option<NaiveDate>,
    counters: &ProgressCounters,
) -> Value {
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);
    let mut props = json!({
        "Content": { "title": [{ "text": { "content": title } }] },
        "Topic": {
            "multi_select": payload.topics.iter()
                .map(|t| json!({ "name": t }))
                .collect::<Vec<_>>()
        },
        "Last Date": { "date": { "start": format_date(today) } },
        "Times/Correct": {
            "rich_text": [{ "type": "text", "text": { "content": counters.format() } }]
        },
    });
    let map = props.as_object_mut().unwrap();
    if let Some(id) = payload.problem_id {
        map.insert("Problem".to_string(), json!({ "number": id }));
    }
    if let Some(url) = payload.url.as_deref().filter(|u| !u.is_empty()) {
        map.insert("Link".to_string(), json!({ "url": url }));
    }
    if let Some(difficulty) = payload.difficulty {
        map.insert(
            "Difficulty".to_string(),
            json!({ "select": { "name": difficulty.as_str() } }),
        );
    }
    if let Some(importance) = payload.importance.as_deref().filter(|i| !i.is_empty()) {
        map.insert(
            "Importance".to_string(),
            json!({ "select": { "name": importance } }),
        );
    }
    if let Some(label) = review {
        map.insert(
            "review".to_string(),
            json!({ "status": { "name": label } }),
        );
    }
    if let Some(date) = next_date {
        map.insert(
            "Next Date".to_string(),
            json!({ "date": { "start": format_date(date) } }),
        );
    }
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn payload() -> SubmissionPayload {
        SubmissionPayload {
            slug: Some("two-sum".to_string()),
            problem_id: Some(1),
            title: Some("Two Sum".to_string()),
            url: Some("https://leetcode.com/problems/two-sum/".to_string()),
            difficulty: Some(Difficulty::Easy),
            topics: vec!["Array".to_string(), "Hash Table".to_string()],
            importance: Some("High".to_string()),
            review_status: Some("done".to_string()),
            code: Some("class Solution: pass".to_string()),
            language: Some("py".to_string()),
            correct: true,
        }
    }

    #[test]
    fn test_build_code_blocks() {
        let blocks = build_code_blocks(&payload());
        assert_eq!(
            blocks[0],
            ContentBlock::Heading { level: 2, text: "Code".to_string() }
        );
        assert_eq!(
            blocks[1],
            ContentBlock::Code {
                language: "python".to_string(),
                text: "class Solution: pass".to_string(),
            }
        );
    }

    #[test]
    fn test_build_code_blocks_empty_code() {
        let mut p = payload();
        p.code = None;
        assert!(build_code_blocks(&p).is_empty());
        p.code = Some(String::new());
        assert!(build_code_blocks(&p).is_empty());
    }

    #[test]
    fn test_code_chunks_round_trip() {
        let mut p = payload();
        let long_code = "x = 1\n".repeat(2000);
        p.code = Some(long_code.clone());
        let blocks = build_code_blocks(&p);
        let joined: String = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Code { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(joined, long_code);
    }

    #[test]
    fn test_children_cap() {
        let mut p = payload();
        p.code = Some("a".repeat(CODE_CHUNK_SIZE * 200));
        let mut children: Vec<ContentBlock> = Vec::new();
        children.extend(build_code_blocks(&p));
        children.truncate(MAX_CHILDREN_BLOCKS);
        assert_eq!(children.len(), MAX_CHILDREN_BLOCKS);
    }

    #[test]
    fn test_build_properties_full() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let counters = ProgressCounters { attempts: 3, correct: 2 };
        let props = build_properties(&payload(), Some("done"), today, Some(next), &counters);

        assert_eq!(props["Content"]["title"][0]["text"]["content"], "Two Sum");
        assert_eq!(props["Problem"]["number"], 1);
        assert_eq!(props["Link"]["url"], "https://leetcode.com/problems/two-sum/");
        assert_eq!(props["Difficulty"]["select"]["name"], "Easy");
        assert_eq!(props["Topic"]["multi_select"][0]["name"], "Array");
        assert_eq!(props["Importance"]["select"]["name"], "High");
        assert_eq!(props["review"]["status"]["name"], "done");
        assert_eq!(props["Last Date"]["date"]["start"], "2024-01-15");
        assert_eq!(props["Next Date"]["date"]["start"], "2024-02-15");
        assert_eq!(
            props["Times/Correct"]["rich_text"][0]["text"]["content"],
            "3/2"
        );
    }

    #[test]
    fn test_build_properties_sparse() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let counters = ProgressCounters { attempts: 1, correct: 0 };
        let p = SubmissionPayload::default();
        let props = build_properties(&p, None, today, None, &counters);

        assert_eq!(props["Content"]["title"][0]["text"]["content"], "LeetCode Problem");
        assert!(props.get("Problem").is_none());
        assert!(props.get("Link").is_none());
        assert!(props.get("Difficulty").is_none());
        assert!(props.get("Importance").is_none());
        assert!(props.get("review").is_none());
        assert!(props.get("Next Date").is_none());
        assert_eq!(props["Topic"]["multi_select"].as_array().unwrap().len(), 0);
        assert_eq!(
            props["Times/Correct"]["rich_text"][0]["text"]["content"],
            "1/0"
        );
    }
}
