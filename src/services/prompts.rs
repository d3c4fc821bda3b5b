//! 提示词模板
//!
//! 每种生成/评估模式对应一个固定模板，占位符形如 `{text}`。
//! 渲染时缺少任何占位符的值都会返回错误，不会留空。

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::TemplateError;

/// 系统消息
pub const SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

const BASE_PROMPT: &str = r#"
Using the text below, create a multiple-choice question (MCQ) with four answer options (a, b, c, d) and provide the correct answer. Indicate the correct answer explicitly.

Text:
{text}

MCQ Question with Answer:
"#;

const CHAIN_OF_THOUGHT_PROMPT: &str = r#"
Using the text below, answer the following question step by step with reasoning. Base your reasoning only on the given text.

Text:
{text}

Question:
{question}

Answer with reasoning:
"#;

const SELF_CONSISTENCY_PROMPT: &str = r#"
Using the text below, select the most probable answer to the question. Your answer should be based on reasoning within the context of the text. Repeat the process multiple times to ensure consistency.

Text:
{text}

Question:
{question}

Answer with reasoning:
"#;

const NONE_OF_THE_ABOVE_PROMPT: &str = r#"
Using the text below, create an MCQ question where the correct answer is replaced by "None of the above." Generate plausible incorrect options.

Text:
{text}

Base Question:
{question}

MCQ with 'None of the above':
"#;

const TRUE_FALSE_PROMPT: &str = r#"
Using the text below, create True-or-False questions based on the options from the following MCQ.

Text:
{text}

MCQ:
{question}

True-or-False Questions:
"#;

const VARYING_OPTIONS_PROMPT: &str = r#"
Transform the following MCQ into one with {option_count} answer options. Ensure options are plausible and one is correct.

Original MCQ:
{question}

MCQ with {option_count} options:
"#;

/// 提示词模板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    Base,
    ChainOfThought,
    SelfConsistency,
    NoneOfAbove,
    TrueFalse,
    VaryingOptions,
}

impl PromptTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            PromptTemplate::Base => "base",
            PromptTemplate::ChainOfThought => "chain_of_thought",
            PromptTemplate::SelfConsistency => "self_consistency",
            PromptTemplate::NoneOfAbove => "none_of_the_above",
            PromptTemplate::TrueFalse => "true_false",
            PromptTemplate::VaryingOptions => "varying_options",
        }
    }

    /// 模板原文
    pub fn source(&self) -> &'static str {
        match self {
            PromptTemplate::Base => BASE_PROMPT,
            PromptTemplate::ChainOfThought => CHAIN_OF_THOUGHT_PROMPT,
            PromptTemplate::SelfConsistency => SELF_CONSISTENCY_PROMPT,
            PromptTemplate::NoneOfAbove => NONE_OF_THE_ABOVE_PROMPT,
            PromptTemplate::TrueFalse => TRUE_FALSE_PROMPT,
            PromptTemplate::VaryingOptions => VARYING_OPTIONS_PROMPT,
        }
    }

    /// 用槽位值渲染模板
    ///
    /// 槽位值只替换一次，值本身包含的 `{...}` 不会被再次解析。
    pub fn render(&self, slots: &[(&str, &str)]) -> Result<String, TemplateError> {
        let values: HashMap<&str, &str> = slots.iter().copied().collect();
        let source = self.source();

        let mut rendered = String::with_capacity(source.len());
        let mut last = 0;
        for caps in slot_pattern().captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = values
                .get(name.as_str())
                .ok_or_else(|| TemplateError::MissingSlot {
                    template: self.name().to_string(),
                    slot: name.as_str().to_string(),
                })?;
            rendered.push_str(&source[last..whole.start()]);
            rendered.push_str(value);
            last = whole.end();
        }
        rendered.push_str(&source[last..]);

        Ok(rendered)
    }

    /// 只带 `text` 槽位的渲染
    pub fn with_text(&self, text: &str) -> Result<String, TemplateError> {
        self.render(&[("text", text)])
    }

    /// 带 `text` 和 `question` 槽位的渲染
    pub fn with_question(&self, text: &str, question: &str) -> Result<String, TemplateError> {
        self.render(&[("text", text), ("question", question)])
    }
}

fn slot_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("slot pattern is valid"))
}
