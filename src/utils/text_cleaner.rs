//! 文本清洗
//!
//! 只保留单词字符、空白和 `. , ! ?`，并把连续空白压缩为一个空格。

use regex::Regex;
use std::sync::OnceLock;

use crate::models::SourceDocument;

fn disallowed_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\w\s.,!?]").expect("pattern is valid"))
}

fn whitespace_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("pattern is valid"))
}

/// 清洗文本
///
/// 先删字符再压缩空白，删掉符号后留下的空白也会被合并。重复调用结果不变。
pub fn clean_text(text: &str) -> String {
    let stripped = disallowed_chars().replace_all(text, "");
    whitespace_runs().replace_all(&stripped, " ").into_owned()
}

/// 原地清洗每个文档的文本
pub fn preprocess_documents(documents: &mut [SourceDocument]) {
    for doc in documents.iter_mut() {
        doc.text = clean_text(&doc.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_clean(output: &str) {
        assert!(!output.contains("  "), "连续空白: {:?}", output);
        assert!(!disallowed_chars().is_match(output), "非法字符: {:?}", output);
        assert!(output.chars().all(|c| c == ' ' || !c.is_whitespace()));
    }

    #[test]
    fn test_collapses_whitespace_and_strips_symbols() {
        let cleaned = clean_text("Bolivia’s  cities –\n\tfloods, (flash) floods & landslides!");
        assert_eq!(cleaned, "Bolivias cities floods, flash floods landslides!");
        assert_clean(&cleaned);
    }

    #[test]
    fn test_keeps_unicode_words() {
        assert_eq!(clean_text("Año   2024: Zürich?"), "Año 2024 Zürich?");
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        for input in [
            "",
            "   ",
            "a @ b",
            "1.1 Purpose\nBolivian cities’ exposure – mainly floods",
            "US$ 75 million; (i) diagnosis\r\n\r\n(ii) programme",
        ] {
            let once = clean_text(input);
            assert_clean(&once);
            assert_eq!(clean_text(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_preprocess_documents_in_place() {
        let mut docs = vec![
            SourceDocument::new("a.pdf", 1, "x\n\ny"),
            SourceDocument::new("a.pdf", 2, "#z"),
        ];
        preprocess_documents(&mut docs);
        assert_eq!(docs[0].text, "x y");
        assert_eq!(docs[1].text, "z");
        assert_eq!(docs[1].page, 2);
    }
}
