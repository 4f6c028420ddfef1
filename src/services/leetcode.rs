//! LeetCode 题目元数据服务
//! 通过 GraphQL 接口按 slug 拉取题号、标题、难度、标签与描述 HTML

use crate::models::{CanonicalQuestion, Difficulty};
use crate::services::http::{ApiClient, RetryPolicy};
use anyhow::{anyhow, Result};
use serde_json::{json, Value};

const GRAPHQL_URL: &str = "https://leetcode.com/graphql";

const QUESTION_QUERY: &str = r#"
query getQuestionDetail($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    title
    difficulty
    topicTags { name }
    content
  }
}"#;

/// 按 slug 拉取题目权威元数据，题目不存在返回 Ok(None)
pub async fn fetch_question(http: &ApiClient, slug: &str) -> Result<Option<CanonicalQuestion>> {
    let body = json!({
        "query": QUESTION_QUERY,
        "variables": { "titleSlug": slug }
    });
    let req = http.inner().post(GRAPHQL_URL).json(&body);
    let resp = http.send(req, &RetryPolicy::idempotent()).await?;
    let status = resp.status();
    let data: Value = resp.json().await?;
    if !status.is_success() {
        return Err(anyhow!("LeetCode 查询失败 ({}): {}", status, data));
    }
    let question = &data["data"]["question"];
    if question.is_null() {
        return Ok(None);
    }
    Ok(Some(parse_question(question)))
}

/// GraphQL question 对象 -> CanonicalQuestion
/// questionId 在线上是字符串形式的数字
fn parse_question(q: &Value) -> CanonicalQuestion {
    let problem_id = match &q["questionId"] {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    let topics = q["topicTags"]
        .as_array()
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t["name"].as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    CanonicalQuestion {
        problem_id,
        title: q["title"].as_str().map(str::to_string),
        difficulty: q["difficulty"].as_str().and_then(Difficulty::normalize),
        topics,
        description_html: q["content"].as_str().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question_full() {
        let q = json!({
            "questionId": "1",
            "title": "Two Sum",
            "difficulty": "Easy",
            "topicTags": [{ "name": "Array" }, { "name": "Hash Table" }],
            "content": "<p>Given an array...</p>"
        });
        let parsed = parse_question(&q);
        assert_eq!(parsed.problem_id, Some(1));
        assert_eq!(parsed.title.as_deref(), Some("Two Sum"));
        assert_eq!(parsed.difficulty, Some(Difficulty::Easy));
        assert_eq!(parsed.topics, vec!["Array", "Hash Table"]);
        assert!(parsed.description_html.is_some());
    }

    #[test]
    fn test_parse_question_partial() {
        let q = json!({ "questionId": "not-a-number", "difficulty": "Unknown" });
        let parsed = parse_question(&q);
        assert_eq!(parsed.problem_id, None);
        assert_eq!(parsed.title, None);
        assert_eq!(parsed.difficulty, None);
        assert!(parsed.topics.is_empty());
    }
}
