use std::str::FromStr;

use crate::error::{AppResult, ConfigError};
use crate::models::VariantKind;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置（必需） ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 实验配置 ---
    /// 变体生成请求的 token 上限
    pub max_tokens: u32,
    /// 需要生成的变体
    pub selected_variants: Vec<VariantKind>,
    /// 自洽性采样次数
    pub self_consistency_samples: usize,
    /// 是否并发发起相互独立的请求
    pub concurrent_requests: bool,
    /// 结果文件目录
    pub results_dir: String,
    /// 输出日志文件
    pub output_log_file: String,
    // --- 输入来源 ---
    pub source_text_file: Option<String>,
    pub pdf_corpus_dir: Option<String>,
    /// PDF 模式下最多处理的页数
    pub max_documents: usize,
}

impl Config {
    pub const API_KEY_VAR: &'static str = "DEEPINFRA_API_KEY";
    pub const BASE_URL_VAR: &'static str = "DEEPINFRA_BASE_URL";
    pub const DEFAULT_MODEL: &'static str = "meta-llama/Meta-Llama-3.1-405B-Instruct";

    /// 从环境变量加载（会先读取 `.env`）
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载
    ///
    /// API 密钥和服务地址缺失时直接返回错误。
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| get(key).ok_or_else(|| ConfigError::EnvVarNotFound { var_name: key.to_string() });

        let llm_api_key = required(Self::API_KEY_VAR)?;
        let llm_api_base_url = required(Self::BASE_URL_VAR)?;

        let selected_variants = match get("MCQ_VARIANTS") {
            Some(raw) => VariantKind::parse_list(&raw)?,
            None => VariantKind::ALL.to_vec(),
        };

        Ok(Self {
            llm_api_key,
            llm_api_base_url,
            llm_model_name: get("LLM_MODEL_NAME").unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            max_tokens: parse_or(&get, "MCQ_MAX_TOKENS", 1500, "u32")?,
            selected_variants,
            self_consistency_samples: parse_or(&get, "SELF_CONSISTENCY_SAMPLES", 5, "usize")?,
            concurrent_requests: parse_or(&get, "CONCURRENT_REQUESTS", false, "bool")?,
            results_dir: get("RESULTS_DIR").unwrap_or_else(|| ".".to_string()),
            output_log_file: get("OUTPUT_LOG_FILE").unwrap_or_else(|| "mcq_generator.log".to_string()),
            source_text_file: get("SOURCE_TEXT_FILE"),
            pdf_corpus_dir: get("PDF_CORPUS_DIR"),
            max_documents: parse_or(&get, "MAX_DOCUMENTS", 1, "usize")?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T, expected_type: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value.parse().map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: key.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DEEPINFRA_API_KEY", "sk-test-1234"),
        ("DEEPINFRA_BASE_URL", "https://api.deepinfra.com/v1/openai"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.llm_model_name, Config::DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 1500);
        assert_eq!(config.self_consistency_samples, 5);
        assert_eq!(config.selected_variants, VariantKind::ALL.to_vec());
        assert!(!config.concurrent_requests);
        assert_eq!(config.output_log_file, "mcq_generator.log");
        assert!(config.pdf_corpus_dir.is_none());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[REQUIRED[1]])).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            AppError::Config(ConfigError::EnvVarNotFound { ref var_name }) if var_name == "DEEPINFRA_API_KEY"
        ));
    }

    #[test]
    fn test_blank_base_url_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[REQUIRED[0], ("DEEPINFRA_BASE_URL", "  ")])).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::EnvVarNotFound { ref var_name }) if var_name == "DEEPINFRA_BASE_URL"
        ));
    }

    #[test]
    fn test_overrides_and_parse_errors() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MCQ_VARIANTS", "Re-ordered Options,None of the Above"));
        pairs.push(("SELF_CONSISTENCY_SAMPLES", "3"));
        pairs.push(("CONCURRENT_REQUESTS", "true"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(
            config.selected_variants,
            vec![VariantKind::Reordered, VariantKind::NoneOfAbove]
        );
        assert_eq!(config.self_consistency_samples, 3);
        assert!(config.concurrent_requests);

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MCQ_MAX_TOKENS", "lots"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::EnvVarParseFailed { ref var_name, .. }) if var_name == "MCQ_MAX_TOKENS"
        ));
    }
}
