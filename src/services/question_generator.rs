//! 题目生成服务 - 业务能力层
//!
//! 负责基础题和各类变体的生成，只处理单道题

use futures::future::join_all;
use tracing::info;

use crate::error::AppResult;
use crate::models::{VariantKind, VariantPayload, VariantSet};
use crate::services::mcq_parser;
use crate::services::prompts::PromptTemplate;
use crate::services::LlmService;

/// 基础题请求的 token 上限
pub const BASE_MAX_TOKENS: u32 = 500;
/// 变体请求的默认 token 上限
pub const DEFAULT_VARIANT_MAX_TOKENS: u32 = 1500;
/// 改变选项数量时的目标数量
pub const DEFAULT_OPTION_COUNTS: [usize; 3] = [2, 3, 6];

/// 题目生成服务
///
/// 模板渲染失败属于程序错误，以 `Err` 返回；
/// 远程调用失败以 `Ok(None)` 返回，只影响对应的那一项。
#[derive(Clone)]
pub struct QuestionGenerator {
    llm: LlmService,
    base_max_tokens: u32,
    variant_max_tokens: u32,
    option_counts: Vec<usize>,
    concurrent: bool,
}

impl QuestionGenerator {
    pub fn new(llm: LlmService) -> Self {
        Self {
            llm,
            base_max_tokens: BASE_MAX_TOKENS,
            variant_max_tokens: DEFAULT_VARIANT_MAX_TOKENS,
            option_counts: DEFAULT_OPTION_COUNTS.to_vec(),
            concurrent: false,
        }
    }

    /// 设置变体请求的 token 上限
    pub fn with_variant_max_tokens(mut self, max_tokens: u32) -> Self {
        self.variant_max_tokens = max_tokens;
        self
    }

    /// 设置改变选项数量时的目标数量
    pub fn with_option_counts(mut self, counts: Vec<usize>) -> Self {
        self.option_counts = counts;
        self
    }

    /// 相互独立的请求是否并发发起（结果顺序不变）
    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn option_counts(&self) -> &[usize] {
        &self.option_counts
    }

    /// 生成带答案的基础题
    pub async fn generate_base_with_answer(&self, text: &str) -> AppResult<Option<String>> {
        let prompt = PromptTemplate::Base.with_text(text)?;
        info!("📝 正在生成带答案的基础题...");
        Ok(self.llm.send_to_llm(&prompt, self.base_max_tokens).await)
    }

    /// 去掉答案行
    pub fn extract_question(&self, mcq_with_answer: &str) -> String {
        mcq_parser::extract_question(mcq_with_answer)
    }

    /// 生成请求的所有变体
    ///
    /// 每种变体最多出现一次，按 `VariantKind` 的声明顺序生成。
    pub async fn generate_variants(
        &self,
        text: &str,
        question: &str,
        kinds: &[VariantKind],
    ) -> AppResult<VariantSet> {
        let mut variants = VariantSet::new();
        if kinds.is_empty() {
            return Ok(variants);
        }

        let mut wanted = kinds.to_vec();
        wanted.sort();
        wanted.dedup();

        info!(
            "🔀 正在生成变体: {}",
            wanted.iter().map(VariantKind::label).collect::<Vec<_>>().join(", ")
        );

        for kind in wanted {
            let payload = self.generate_variant(kind, text, question).await?;
            variants.insert(kind, payload);
        }

        Ok(variants)
    }

    /// 生成单个变体
    pub async fn generate_variant(
        &self,
        kind: VariantKind,
        text: &str,
        question: &str,
    ) -> AppResult<VariantPayload> {
        let payload = match kind {
            VariantKind::Reordered => {
                info!("已打乱选项顺序");
                VariantPayload::Single(Some(mcq_parser::reorder_options(question)))
            }
            VariantKind::VaryingOptionCount => {
                VariantPayload::Multiple(self.generate_with_varying_options(question).await?)
            }
            VariantKind::NoneOfAbove => {
                let prompt = PromptTemplate::NoneOfAbove.with_question(text, question)?;
                info!("正在生成 'None of the above' 变体");
                VariantPayload::Single(self.llm.send_to_llm(&prompt, self.variant_max_tokens).await)
            }
            VariantKind::TrueFalse => {
                let prompt = PromptTemplate::TrueFalse.with_question(text, question)?;
                info!("正在生成判断题变体");
                VariantPayload::Single(self.llm.send_to_llm(&prompt, self.variant_max_tokens).await)
            }
        };
        Ok(payload)
    }

    /// 按每个目标数量各请求一次，结果与 `option_counts` 一一对应
    async fn generate_with_varying_options(&self, question: &str) -> AppResult<Vec<Option<String>>> {
        let prompts = self
            .option_counts
            .iter()
            .map(|n| {
                let count = n.to_string();
                PromptTemplate::VaryingOptions.render(&[("question", question), ("option_count", &count)])
            })
            .collect::<Result<Vec<_>, _>>()?;

        let results = if self.concurrent {
            join_all(
                prompts
                    .iter()
                    .map(|prompt| self.llm.send_to_llm(prompt, self.variant_max_tokens)),
            )
            .await
        } else {
            let mut results = Vec::with_capacity(prompts.len());
            for (prompt, n) in prompts.iter().zip(&self.option_counts) {
                results.push(self.llm.send_to_llm(prompt, self.variant_max_tokens).await);
                info!("已生成 {} 个选项的题目", n);
            }
            results
        };

        Ok(results)
    }
}
