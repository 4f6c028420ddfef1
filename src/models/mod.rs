//! 数据模型模块
//! 定义提交载荷、题目元数据、内容块和进度计数器

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// 题目难度枚举
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 从任意大小写的字符串归一化，无法识别返回 None
    pub fn normalize(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// 提交载荷（调用方传入）
/// 字段允许缺省，缺省项由编排器按 slug 回填
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionPayload {
    pub slug: Option<String>,
    pub problem_id: Option<i64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub topics: Vec<String>,
    pub importance: Option<String>,
    pub review_status: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub correct: bool,
}

/// 题目权威元数据（来自 LeetCode GraphQL）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalQuestion {
    pub problem_id: Option<i64>,
    pub title: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub topics: Vec<String>,
    pub description_html: Option<String>,
}

/// 内容块：描述与代码统一的文档单元，可渲染为 Notion block JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Paragraph(String),
    BulletItem(String),
    NumberedItem(String),
    Code { language: String, text: String },
    Image { url: String },
}

impl ContentBlock {
    /// 渲染为 Notion API 的 block 对象
    pub fn to_notion_json(&self) -> Value {
        match self {
            ContentBlock::Heading { level, text } => {
                // Notion 只支持 heading_1..3，更深的层级压到 heading_3
                let key = match level {
                    1 => "heading_1",
                    2 => "heading_2",
                    _ => "heading_3",
                };
                json!({
                    "object": "block",
                    "type": key,
                    (key): { "rich_text": [rich_text(text)] }
                })
            }
            ContentBlock::Paragraph(text) => json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": [rich_text(text)] }
            }),
            ContentBlock::BulletItem(text) => json!({
                "object": "block",
                "type": "bulleted_list_item",
                "bulleted_list_item": { "rich_text": [rich_text(text)] }
            }),
            ContentBlock::NumberedItem(text) => json!({
                "object": "block",
                "type": "numbered_list_item",
                "numbered_list_item": { "rich_text": [rich_text(text)] }
            }),
            ContentBlock::Code { language, text } => json!({
                "object": "block",
                "type": "code",
                "code": {
                    "language": language,
                    "rich_text": [rich_text(text)]
                }
            }),
            ContentBlock::Image { url } => json!({
                "object": "block",
                "type": "image",
                "image": { "type": "external", "external": { "url": url } }
            }),
        }
    }
}

fn rich_text(text: &str) -> Value {
    json!({ "type": "text", "text": { "content": text } })
}

/// 刷题进度计数器，存储格式 "attempts/correct"
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressCounters {
    pub attempts: i64,
    pub correct: i64,
}

impl ProgressCounters {
    /// 从 "N/M" 文本解析，格式不符返回 (0, 0)
    pub fn parse(text: &str) -> Self {
        let t = text.trim();
        if let Some((a, c)) = t.split_once('/') {
            if let (Ok(attempts), Ok(correct)) =
                (a.trim().parse::<i64>(), c.trim().parse::<i64>())
            {
                if attempts >= 0 && correct >= 0 {
                    return Self { attempts, correct };
                }
            }
        }
        Self::default()
    }

    /// 本次同步累加：次数 +1，答对时正确数 +1
    pub fn bump(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn format(&self) -> String {
        format!("{}/{}", self.attempts, self.correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_normalize() {
        assert_eq!(Difficulty::normalize("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::normalize("MEDIUM"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::normalize(" Hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::normalize("insane"), None);
    }

    #[test]
    fn test_counters_parse() {
        assert_eq!(
            ProgressCounters::parse("3/2"),
            ProgressCounters { attempts: 3, correct: 2 }
        );
        assert_eq!(
            ProgressCounters::parse(" 10 / 7 "),
            ProgressCounters { attempts: 10, correct: 7 }
        );
        assert_eq!(ProgressCounters::parse(""), ProgressCounters::default());
        assert_eq!(ProgressCounters::parse("abc"), ProgressCounters::default());
        assert_eq!(ProgressCounters::parse("-1/2"), ProgressCounters::default());
    }

    #[test]
    fn test_counters_bump_monotonic() {
        let mut c = ProgressCounters::default();
        for (i, correct) in [true, false, true, true].iter().enumerate() {
            c.bump(*correct);
            assert_eq!(c.attempts as usize, i + 1);
        }
        assert_eq!(c.attempts, 4);
        assert_eq!(c.correct, 3);
        assert_eq!(c.format(), "4/3");
    }

    #[test]
    fn test_block_to_notion_json() {
        let b = ContentBlock::Code {
            language: "python".to_string(),
            text: "print(1)".to_string(),
        };
        let v = b.to_notion_json();
        assert_eq!(v["type"], "code");
        assert_eq!(v["code"]["language"], "python");
        assert_eq!(v["code"]["rich_text"][0]["text"]["content"], "print(1)");

        let h = ContentBlock::Heading { level: 2, text: "Problem".to_string() };
        assert_eq!(h.to_notion_json()["type"], "heading_2");
    }

    #[test]
    fn test_payload_deserialize_camel_case() {
        let p: SubmissionPayload = serde_json::from_str(
            r#"{"slug":"two-sum","problemId":1,"reviewStatus":"done","correct":true}"#,
        )
        .unwrap();
        assert_eq!(p.slug.as_deref(), Some("two-sum"));
        assert_eq!(p.problem_id, Some(1));
        assert_eq!(p.review_status.as_deref(), Some("done"));
        assert!(p.correct);
        assert!(p.topics.is_empty());
    }
}
