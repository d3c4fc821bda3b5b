//! 题目文本解析 - 业务能力层
//!
//! 从 LLM 返回的非结构化文本中尽力提取结构。
//!
//! ## 语法
//!
//! - **选项行**：去掉行首空白后，以 `a)` `b)` `c)` `d)` 之一开头（字母不区分大小写）。
//! - **答案行**：去掉行首空白和 `#` `>` 后，前两个单词（各自去掉两端的 `*` `_` `:` `-`）
//!   以 `correct answer` 开头（不区分大小写，单词间空白数量不限）。
//!   可以覆盖 `**Correct Answer:** b)`、`**Correct** **Answer:** b`、`Correct: answer b`、
//!   `__correct  answer__: b` 等写法。
//!
//! 找不到任何可识别的结构时，原样返回输入并记录日志。

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// 固定的选项标记
pub const OPTION_MARKERS: [char; 4] = ['a', 'b', 'c', 'd'];

/// 答案行前缀（已规范化）
pub const ANSWER_MARKER: &str = "correct answer";

/// 是否为选项行
pub fn is_option_line(line: &str) -> bool {
    let mut chars = line.trim_start().chars();
    match (chars.next(), chars.next()) {
        (Some(letter), Some(')')) => OPTION_MARKERS.contains(&letter.to_ascii_lowercase()),
        _ => false,
    }
}

/// 是否为答案行
pub fn is_answer_line(line: &str) -> bool {
    let stripped = line.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '#' | '>'));
    let normalized = stripped
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| matches!(c, '*' | '_' | ':' | '-')))
        .filter(|token| !token.is_empty())
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    normalized.starts_with(ANSWER_MARKER)
}

/// 提取所有选项行（保持原顺序）
///
/// 选项少于四个时返回找到的部分；空文本返回空列表。
pub fn parse_options(mcq: &str) -> Vec<&str> {
    mcq.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| is_option_line(line))
        .collect()
}

/// 去掉答案行，得到只含题干和选项的题目
///
/// 没有答案行时返回去掉首尾空白的原文。
pub fn extract_question(mcq_with_answer: &str) -> String {
    let lines: Vec<&str> = mcq_with_answer.lines().collect();
    let kept: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| !is_answer_line(line))
        .collect();

    if kept.len() == lines.len() {
        debug!("未找到答案行，保留原始题目文本");
    }

    kept.join("\n").trim().to_string()
}

/// 随机打乱选项顺序
pub fn reorder_options(question: &str) -> String {
    reorder_options_with(question, &mut rand::thread_rng())
}

/// 使用指定随机源打乱选项顺序
///
/// 找不到任何选项行时原样返回输入。
pub fn reorder_options_with<R: Rng + ?Sized>(question: &str, rng: &mut R) -> String {
    let mut options = parse_options(question);
    if options.is_empty() {
        debug!("未找到选项行，保留原始题目文本");
        return question.to_string();
    }

    options.shuffle(rng);
    options.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const MCQ: &str = "What colour is the sky?\na) Blue\nb) Green\nc) Red\nd) Yellow\n**Correct Answer:** a) Blue";

    #[test]
    fn test_extract_question_drops_answer_line() {
        let question = extract_question(MCQ);
        assert_eq!(
            question,
            "What colour is the sky?\na) Blue\nb) Green\nc) Red\nd) Yellow"
        );
    }

    #[test]
    fn test_extract_question_is_idempotent() {
        let once = extract_question(MCQ);
        assert_eq!(extract_question(&once), once);

        let no_marker = "  Just a stem\na) one\n";
        let once = extract_question(no_marker);
        assert_eq!(once, "Just a stem\na) one");
        assert_eq!(extract_question(&once), once);
    }

    #[test]
    fn test_answer_marker_variants() {
        assert!(is_answer_line("**Correct Answer:** b)"));
        assert!(is_answer_line("correct answer: b"));
        assert!(is_answer_line("  Correct   Answer - c"));
        assert!(is_answer_line("__correct answer__: d"));
        assert!(is_answer_line("### Correct Answer"));
        assert!(is_answer_line("**Correct** **Answer:** b"));
        assert!(is_answer_line("_Correct_ _answer_ - a)"));
        assert!(is_answer_line("Correct: answer b"));
        assert!(is_answer_line("> **Correct Answer**: c"));
        assert!(!is_answer_line("a) The correct answer is obvious"));
        assert!(!is_answer_line("Which is the correct answer?"));
    }

    #[test]
    fn test_extract_question_does_not_touch_answer_like_options() {
        let mcq = "Stem\na) correct answer here\nCorrect answer: a";
        assert_eq!(extract_question(mcq), "Stem\na) correct answer here");

        let split = "Stem\na) one\nb) two\n**Correct** **Answer:** b) two";
        assert_eq!(extract_question(split), "Stem\na) one\nb) two");
    }

    #[test]
    fn test_parse_options_finds_markers() {
        let question = extract_question(MCQ);
        assert_eq!(
            parse_options(&question),
            vec!["a) Blue", "b) Green", "c) Red", "d) Yellow"]
        );
        assert_eq!(parse_options("Stem\n  B) indented\ne) not an option"), vec!["  B) indented"]);
        assert!(parse_options("").is_empty());
    }

    #[test]
    fn test_reorder_keeps_the_same_four_lines() {
        let question = extract_question(MCQ);
        let mut rng = StdRng::seed_from_u64(7);
        let reordered = reorder_options_with(&question, &mut rng);

        let got: HashSet<&str> = reordered.lines().collect();
        let want: HashSet<&str> = ["a) Blue", "b) Green", "c) Red", "d) Yellow"].into_iter().collect();
        assert_eq!(got, want);
        assert_eq!(reordered.lines().count(), 4);
    }

    #[test]
    fn test_reorder_with_partial_options_returns_subset() {
        let reordered = reorder_options("Stem\na) one\nc) three");
        let got: HashSet<&str> = reordered.lines().collect();
        assert_eq!(got, ["a) one", "c) three"].into_iter().collect());
    }

    #[test]
    fn test_reorder_without_options_falls_back_to_input() {
        assert_eq!(reorder_options(""), "");
        assert_eq!(reorder_options("no options at all"), "no options at all");
    }
}
