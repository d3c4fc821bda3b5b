//! 实验结果数据模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::mcq::{QuestionLabel, VariantSet};

/// 单个题目的评估结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// 思维链回答
    #[serde(rename = "CoT")]
    pub chain_of_thought: Option<String>,
    /// 自洽性采样（按调用顺序）
    #[serde(rename = "Self Consistency")]
    pub self_consistency_samples: Vec<Option<String>>,
}

impl EvaluationResult {
    /// 上游题目缺失时的评估结果：不发起任何调用，全部为 null
    pub fn missing(n_samples: usize) -> Self {
        Self {
            chain_of_thought: None,
            self_consistency_samples: vec![None; n_samples],
        }
    }
}

/// 一次实验的完整记录，构建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    #[serde(rename = "Base MCQ with Answer")]
    pub base_mcq_with_answer: Option<String>,
    #[serde(rename = "Variants")]
    pub variants: VariantSet,
    #[serde(rename = "Evaluations")]
    pub evaluations: BTreeMap<QuestionLabel, EvaluationResult>,
}

impl ExperimentRecord {
    /// 评估键是否恰好等于变体键加上 "Base MCQ"
    pub fn labels_consistent(&self) -> bool {
        let expected = std::iter::once(QuestionLabel::Base)
            .chain(self.variants.keys().copied().map(QuestionLabel::from));
        self.evaluations.keys().copied().eq(expected)
    }

    /// 失败（null）条目数量
    pub fn failure_count(&self) -> usize {
        use super::mcq::VariantPayload;

        let base = usize::from(self.base_mcq_with_answer.is_none());
        let variants: usize = self
            .variants
            .values()
            .map(|payload| match payload {
                VariantPayload::Single(text) => usize::from(text.is_none()),
                VariantPayload::Multiple(items) => items.iter().filter(|i| i.is_none()).count(),
            })
            .sum();
        let evaluations: usize = self
            .evaluations
            .values()
            .map(|eval| {
                usize::from(eval.chain_of_thought.is_none())
                    + eval.self_consistency_samples.iter().filter(|s| s.is_none()).count()
            })
            .sum();

        base + variants + evaluations
    }
}
