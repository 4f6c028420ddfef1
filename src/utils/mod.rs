//! 工具函数：代码分片与语言名归一化

/// 单个代码块的最大字符数
pub const CODE_CHUNK_SIZE: usize = 1800;

/// 按固定字符数切分代码，保证在字符边界上切开
/// 各分片按序拼接后与原文完全一致
pub fn split_chunks(s: &str, size: usize) -> Vec<String> {
    if s.is_empty() || size == 0 {
        return Vec::new();
    }
    let mut chunks = Vec::new();
    let mut current = String::with_capacity(size);
    let mut count = 0usize;
    for ch in s.chars() {
        current.push(ch);
        count += 1;
        if count >= size {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// 归一化编程语言名称为 Notion code block 接受的写法
/// 未识别的名称原样返回，空值视为 plain text
pub fn normalize_language(s: Option<&str>) -> String {
    let raw = match s {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => return "plain text".to_string(),
    };
    match raw.to_lowercase().as_str() {
        "cpp" | "c++" => "c++".to_string(),
        "csharp" | "cs" | "c#" => "c#".to_string(),
        "py" | "python3" => "python".to_string(),
        "js" => "javascript".to_string(),
        "ts" => "typescript".to_string(),
        "text" | "plaintext" => "plain text".to_string(),
        "sh" => "bash".to_string(),
        "shell" => "shell".to_string(),
        "yml" => "yaml".to_string(),
        "htm" => "html".to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_chunks_round_trip() {
        let code = "fn main() {\n    println!(\"hello\");\n}\n".repeat(200);
        let chunks = split_chunks(&code, CODE_CHUNK_SIZE);
        assert!(chunks.len() > 1);
        for c in &chunks[..chunks.len() - 1] {
            assert_eq!(c.chars().count(), CODE_CHUNK_SIZE);
        }
        assert_eq!(chunks.concat(), code);
    }

    #[test]
    fn test_split_chunks_multibyte() {
        // 多字节字符不能被切断
        let code = "哈希表查找，时间复杂度 O(n)。".repeat(300);
        let chunks = split_chunks(&code, CODE_CHUNK_SIZE);
        assert_eq!(chunks.concat(), code);
    }

    #[test]
    fn test_split_chunks_empty() {
        assert!(split_chunks("", CODE_CHUNK_SIZE).is_empty());
        assert_eq!(split_chunks("short", CODE_CHUNK_SIZE), vec!["short"]);
    }

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language(Some("py")), "python");
        assert_eq!(normalize_language(Some("Python3")), "python");
        assert_eq!(normalize_language(Some("CPP")), "c++");
        assert_eq!(normalize_language(Some("cs")), "c#");
        assert_eq!(normalize_language(Some("js")), "javascript");
        assert_eq!(normalize_language(Some("yml")), "yaml");
        assert_eq!(normalize_language(Some("sh")), "bash");
        assert_eq!(normalize_language(Some("plaintext")), "plain text");
        assert_eq!(normalize_language(Some("rust")), "rust");
        assert_eq!(normalize_language(Some("Kotlin")), "Kotlin");
        assert_eq!(normalize_language(None), "plain text");
        assert_eq!(normalize_language(Some("  ")), "plain text");
    }
}
