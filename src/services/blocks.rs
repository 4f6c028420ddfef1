//! HTML 内容块转换引擎
//! 将 LeetCode 题目描述的受限 HTML 片段转换为有序的内容块文档
//!
//! 两遍变换：先把非行内结构（代码、图片）抽入 FIFO 队列并留下占位符，
//! 再按行分类还原。输入假定来自已知站点，不做通用 HTML 清洗。

use crate::models::ContentBlock;
use regex::Regex;
use std::collections::VecDeque;

/// 描述文档的块数上限
pub const MAX_DESCRIPTION_BLOCKS: usize = 90;

/// 图片相对路径补全的站点源
const SITE_ORIGIN: &str = "https://leetcode.com";

const CODE_PLACEHOLDER: &str = "__CODE_BLOCK_PLACEHOLDER__";
const IMG_PLACEHOLDER: &str = "__IMG_PLACEHOLDER__";

/// 解码受限 HTML 实体子集
pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// 补全图片地址：相对路径与协议相对路径按站点源绝对化
pub fn absolutize(src: &str) -> String {
    let s = src.trim();
    if s.is_empty() {
        return String::new();
    }
    let lower = s.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return s.to_string();
    }
    if s.starts_with("//") {
        return format!("https:{}", s);
    }
    if s.starts_with('/') {
        return format!("{}{}", SITE_ORIGIN, s);
    }
    format!("{}/{}", SITE_ORIGIN, s.trim_start_matches('/'))
}

/// HTML 片段 -> 内容块文档
/// 空输入产出空文档；结果截断到 MAX_DESCRIPTION_BLOCKS
pub fn html_to_blocks(html: &str) -> Vec<ContentBlock> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    // 换行归一化：<br> 与段落/标题闭合标签变为换行
    let br_re = Regex::new(r"(?i)<br\s*/?>").unwrap();
    let close_re = Regex::new(r"(?i)</p>|</h[1-6]>").unwrap();
    let mut s = br_re.replace_all(html, "\n").to_string();
    s = close_re.replace_all(&s, "\n\n").to_string();

    // 抽取代码块：原文实体解码后入队，占位符顶替
    let mut code_queue: VecDeque<String> = VecDeque::new();
    let pre_re = Regex::new(r"(?is)<pre[^>]*>\s*<code[^>]*>(.*?)</code>\s*</pre>").unwrap();
    s = pre_re
        .replace_all(&s, |caps: &regex::Captures| {
            code_queue.push_back(decode_entities(&caps[1]).trim().to_string());
            format!("\n\n{}\n\n", CODE_PLACEHOLDER)
        })
        .to_string();

    // 抽取图片地址
    let mut img_queue: VecDeque<String> = VecDeque::new();
    let img_re = Regex::new(r#"(?i)<img[^>]*src=["']([^"']+)["'][^>]*>"#).unwrap();
    s = img_re
        .replace_all(&s, |caps: &regex::Captures| {
            img_queue.push_back(absolutize(&caps[1]));
            format!("\n\n{}\n\n", IMG_PLACEHOLDER)
        })
        .to_string();

    // 列表容器标签退化为换行，列表语义靠行前缀恢复
    let list_re = Regex::new(r"(?i)</?(ul|ol)>").unwrap();
    s = list_re.replace_all(&s, "\n").to_string();

    // 去掉剩余标签后再解码实体
    let tag_re = Regex::new(r"</?[^>]+>").unwrap();
    s = tag_re.replace_all(&s, "").to_string();
    s = decode_entities(&s);

    let bullet_re = Regex::new(r"^[-*]\s+").unwrap();
    let numbered_re = Regex::new(r"^\d+\.\s+").unwrap();

    let mut blocks = vec![ContentBlock::Heading {
        level: 2,
        text: "Problem".to_string(),
    }];

    for line in s.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if line == CODE_PLACEHOLDER {
            // 队列空时该行不产出块
            if let Some(code) = code_queue.pop_front() {
                blocks.push(ContentBlock::Code {
                    language: "plain text".to_string(),
                    text: code,
                });
            }
            continue;
        }
        if line == IMG_PLACEHOLDER {
            if let Some(url) = img_queue.pop_front() {
                if !url.is_empty() {
                    blocks.push(ContentBlock::Image { url });
                }
            }
            continue;
        }
        if bullet_re.is_match(line) {
            blocks.push(ContentBlock::BulletItem(
                bullet_re.replace(line, "").to_string(),
            ));
            continue;
        }
        if numbered_re.is_match(line) {
            blocks.push(ContentBlock::NumberedItem(
                numbered_re.replace(line, "").to_string(),
            ));
            continue;
        }
        blocks.push(ContentBlock::Paragraph(line.to_string()));
    }

    blocks.truncate(MAX_DESCRIPTION_BLOCKS);
    blocks
}
