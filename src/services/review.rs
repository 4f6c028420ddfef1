//! 复习状态解析
//! 把请求的复习标签校验到数据库实际允许的选项，并按标签推算下次复习日期
//!
//! 选项列表每次同步从远端 schema 拉取（见 notion 服务），
//! 这里只做纯决策逻辑，便于单独测试。

use chrono::{Duration, Months, NaiveDate};

/// 兜底标签：选项里存在时优先回退到它
const FALLBACK_LABEL: &str = "need review";

/// 将请求标签解析为 schema 允许的选项
/// 规则依次为：精确匹配 > 忽略大小写匹配 > "need review" 兜底 > 首个选项
pub fn resolve_status(requested: Option<&str>, options: &[String]) -> Option<String> {
    let raw = requested?.trim();
    if raw.is_empty() {
        return None;
    }
    // 弯引号归一化为直引号
    let desired = raw.replace('\u{2019}', "'");
    if let Some(hit) = options.iter().find(|o| **o == desired) {
        return Some(hit.clone());
    }
    let lower = desired.to_lowercase();
    if let Some(hit) = options.iter().find(|o| o.to_lowercase() == lower) {
        return Some(hit.clone());
    }
    if let Some(hit) = options.iter().find(|o| *o == FALLBACK_LABEL) {
        return Some(hit.clone());
    }
    options.first().cloned()
}

/// 按已解析标签推算下次复习日期（大小写不敏感）
/// done +1 个月；need review +7 天；don't understand +2 天；其余不产出日期
pub fn next_review_date(label: &str, today: NaiveDate) -> Option<NaiveDate> {
    match label.to_lowercase().as_str() {
        "done" => today.checked_add_months(Months::new(1)),
        "need review" => Some(today + Duration::days(7)),
        "don't understand" => Some(today + Duration::days(2)),
        _ => None,
    }
}

/// 日历日期格式化，无时间部分
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
