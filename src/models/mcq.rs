//! 题目与变体数据模型

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// 题目变体类型
///
/// 声明顺序即生成与评估顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VariantKind {
    /// 打乱选项顺序
    #[serde(rename = "Re-ordered Options")]
    Reordered,
    /// 改变选项数量
    #[serde(rename = "Varying Options")]
    VaryingOptionCount,
    /// 正确答案替换为 "None of the above"
    #[serde(rename = "None of the Above")]
    NoneOfAbove,
    /// 选项转换为判断题
    #[serde(rename = "True or False")]
    TrueFalse,
}

impl VariantKind {
    /// 全部变体（默认请求集合）
    pub const ALL: [VariantKind; 4] = [
        VariantKind::Reordered,
        VariantKind::VaryingOptionCount,
        VariantKind::NoneOfAbove,
        VariantKind::TrueFalse,
    ];

    /// 结果文件中使用的名称
    pub fn label(&self) -> &'static str {
        match self {
            VariantKind::Reordered => "Re-ordered Options",
            VariantKind::VaryingOptionCount => "Varying Options",
            VariantKind::NoneOfAbove => "None of the Above",
            VariantKind::TrueFalse => "True or False",
        }
    }

    /// 解析逗号分隔的变体列表，空字符串表示全部变体
    pub fn parse_list(raw: &str) -> Result<Vec<VariantKind>, ConfigError> {
        let kinds = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if kinds.is_empty() {
            return Ok(Self::ALL.to_vec());
        }
        Ok(kinds)
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VariantKind {
    type Err = ConfigError;

    /// 接受结果文件中的名称，也接受枚举名（不区分大小写）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.label().eq_ignore_ascii_case(wanted)
                    || format!("{:?}", kind).eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ConfigError::UnknownVariant {
                label: wanted.to_string(),
            })
    }
}

/// 变体内容
///
/// `None` 表示上游 LLM 调用失败。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantPayload {
    /// 单个题目文本
    Single(Option<String>),
    /// 按选项数量排列的题目列表
    Multiple(Vec<Option<String>>),
}

impl VariantPayload {
    /// 评估时使用的题目文本
    ///
    /// 列表形式用空行连接所有成功的条目；没有任何可用文本时返回 `None`。
    pub fn question_text(&self) -> Option<String> {
        match self {
            VariantPayload::Single(text) => text.clone(),
            VariantPayload::Multiple(items) => {
                let present: Vec<&str> = items.iter().flatten().map(String::as_str).collect();
                if present.is_empty() {
                    None
                } else {
                    Some(present.join("\n\n"))
                }
            }
        }
    }

    /// 基础题缺失时的占位内容（序列化为 null）
    pub fn missing() -> Self {
        VariantPayload::Single(None)
    }
}

/// 变体集合
pub type VariantSet = BTreeMap<VariantKind, VariantPayload>;

/// 评估结果中的题目标签：基础题或某个变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QuestionLabel {
    Base,
    Variant(VariantKind),
}

impl QuestionLabel {
    pub const BASE_LABEL: &'static str = "Base MCQ";
}

impl fmt::Display for QuestionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionLabel::Base => f.write_str(Self::BASE_LABEL),
            QuestionLabel::Variant(kind) => f.write_str(kind.label()),
        }
    }
}

impl FromStr for QuestionLabel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == Self::BASE_LABEL {
            return Ok(QuestionLabel::Base);
        }
        s.parse().map(QuestionLabel::Variant)
    }
}

impl From<VariantKind> for QuestionLabel {
    fn from(kind: VariantKind) -> Self {
        QuestionLabel::Variant(kind)
    }
}

impl Serialize for QuestionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuestionLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_accepts_labels_and_names() {
        let kinds = VariantKind::parse_list("Re-ordered Options, truefalse").unwrap();
        assert_eq!(kinds, vec![VariantKind::Reordered, VariantKind::TrueFalse]);
    }

    #[test]
    fn test_parse_list_empty_means_all() {
        assert_eq!(VariantKind::parse_list(" ").unwrap(), VariantKind::ALL.to_vec());
    }

    #[test]
    fn test_parse_list_rejects_unknown() {
        let err = VariantKind::parse_list("Reordered, Matching").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownVariant { label } if label == "Matching"));
    }

    #[test]
    fn test_labels_serialize_as_map_keys() {
        let mut variants = VariantSet::new();
        variants.insert(
            VariantKind::VaryingOptionCount,
            VariantPayload::Multiple(vec![Some("two".to_string()), None]),
        );
        variants.insert(VariantKind::Reordered, VariantPayload::Single(Some("b)\na)".to_string())));

        let json = serde_json::to_value(&variants).unwrap();
        assert_eq!(json["Re-ordered Options"], "b)\na)");
        assert_eq!(json["Varying Options"], serde_json::json!(["two", null]));
    }

    #[test]
    fn test_question_label_round_trips_through_string() {
        let label: QuestionLabel = "Base MCQ".parse().unwrap();
        assert_eq!(label, QuestionLabel::Base);
        let label: QuestionLabel = "None of the Above".parse().unwrap();
        assert_eq!(label, QuestionLabel::Variant(VariantKind::NoneOfAbove));
        assert!(QuestionLabel::Base < QuestionLabel::Variant(VariantKind::Reordered));
    }

    #[test]
    fn test_multiple_payload_question_text_skips_failures() {
        let payload = VariantPayload::Multiple(vec![None, Some("3 options".to_string()), None]);
        assert_eq!(payload.question_text().as_deref(), Some("3 options"));
        assert_eq!(VariantPayload::Multiple(vec![None, None]).question_text(), None);
        assert_eq!(VariantPayload::Single(None).question_text(), None);
    }
}
