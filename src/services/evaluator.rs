//! 题目评估服务 - 业务能力层
//!
//! 思维链（CoT）与自洽性采样两种评估方式

use futures::future::join_all;
use tracing::info;

use crate::error::AppResult;
use crate::models::EvaluationResult;
use crate::services::prompts::PromptTemplate;
use crate::services::LlmService;

/// 思维链请求的 token 上限
pub const CHAIN_OF_THOUGHT_MAX_TOKENS: u32 = 1500;
/// 自洽性单次采样的 token 上限
pub const SELF_CONSISTENCY_MAX_TOKENS: u32 = 1000;
/// 默认采样次数
pub const DEFAULT_SAMPLES: usize = 5;

/// 题目评估服务
///
/// 只收集原始回答，不做投票或聚合。
#[derive(Clone)]
pub struct Evaluator {
    llm: LlmService,
    samples: usize,
    concurrent: bool,
}

impl Evaluator {
    pub fn new(llm: LlmService) -> Self {
        Self {
            llm,
            samples: DEFAULT_SAMPLES,
            concurrent: false,
        }
    }

    /// 设置自洽性采样次数
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// 采样是否并发发起（结果仍按调用顺序排列）
    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// 思维链评估
    pub async fn evaluate_chain_of_thought(&self, text: &str, question: &str) -> AppResult<Option<String>> {
        let prompt = PromptTemplate::ChainOfThought.with_question(text, question)?;
        info!("🧠 正在进行思维链评估...");
        Ok(self.llm.send_to_llm(&prompt, CHAIN_OF_THOUGHT_MAX_TOKENS).await)
    }

    /// 自洽性评估：独立采样 `n_samples` 次
    ///
    /// 返回列表长度恒为 `n_samples`，失败的采样保留为 `None`。
    pub async fn evaluate_self_consistency(
        &self,
        text: &str,
        question: &str,
        n_samples: usize,
    ) -> AppResult<Vec<Option<String>>> {
        let prompt = PromptTemplate::SelfConsistency.with_question(text, question)?;
        info!("🔁 正在进行自洽性评估 ({} 次采样)...", n_samples);

        if self.concurrent {
            let calls = (0..n_samples).map(|_| self.llm.send_to_llm(&prompt, SELF_CONSISTENCY_MAX_TOKENS));
            return Ok(join_all(calls).await);
        }

        let mut samples = Vec::with_capacity(n_samples);
        for _ in 0..n_samples {
            samples.push(self.llm.send_to_llm(&prompt, SELF_CONSISTENCY_MAX_TOKENS).await);
        }
        Ok(samples)
    }

    /// 两种评估都做一遍
    pub async fn evaluate(&self, text: &str, question: &str) -> AppResult<EvaluationResult> {
        let chain_of_thought = self.evaluate_chain_of_thought(text, question).await?;
        let self_consistency_samples = self
            .evaluate_self_consistency(text, question, self.samples)
            .await?;

        Ok(EvaluationResult {
            chain_of_thought,
            self_consistency_samples,
        })
    }
}
