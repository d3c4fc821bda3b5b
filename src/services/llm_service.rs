//! LLM 服务 - 业务能力层
//!
//! 只负责"发一次补全请求"能力，不关心流程
//!
//! ## 约定
//! - 每次请求固定两条消息：系统消息 + 用户提示词
//! - 温度固定为 0.7
//! - 回复去掉首尾空白
//! - 远程失败记录日志后返回 `None`，不重试，也不中断整个实验

use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::{CompletionBackend, CompletionRequest, DEFAULT_TEMPERATURE};
use crate::services::prompts::SYSTEM_MESSAGE;

/// LLM 服务
///
/// 职责：
/// - 用注入的补全后端发送单个提示词
/// - 把远程错误转换为 `None`
/// - 不关心提示词内容和调用顺序
#[derive(Clone)]
pub struct LlmService {
    backend: Arc<dyn CompletionBackend>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(backend: Arc<dyn CompletionBackend>, model_name: impl Into<String>) -> Self {
        Self {
            backend,
            model_name: model_name.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 构建补全请求
    pub fn build_request(&self, prompt: &str, max_tokens: u32) -> CompletionRequest {
        CompletionRequest {
            model: self.model_name.clone(),
            system_message: SYSTEM_MESSAGE.to_string(),
            user_message: prompt.to_string(),
            max_tokens,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// 发送提示词，失败时返回 `None`
    pub async fn send_to_llm(&self, prompt: &str, max_tokens: u32) -> Option<String> {
        let request = self.build_request(prompt, max_tokens);

        match self.backend.complete(&request).await {
            Ok(completion) => {
                if let Some(usage) = completion.usage {
                    debug!(
                        "Token 用量: prompt {} / completion {}",
                        usage.prompt_tokens, usage.completion_tokens
                    );
                }
                Some(completion.text.trim().to_string())
            }
            Err(e) => {
                warn!("⚠️ 补全请求失败，结果记为 null: {}", e);
                None
            }
        }
    }
}
