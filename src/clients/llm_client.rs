/// LLM API 客户端
///
/// 封装与 OpenAI 兼容服务（DeepInfra 等）的聊天补全调用
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};

/// 固定采样温度
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// 一次补全请求
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_message: String,
    pub user_message: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Token 用量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// 补全结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// 去掉首尾空白的回复文本
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// 远程补全服务
///
/// 测试中可以用脚本化的实现替换真实客户端。
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion>;
}

/// LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        Self::with_endpoint(&config.llm_api_key, &config.llm_api_base_url)
    }

    /// 使用指定凭据和端点创建客户端
    pub fn with_endpoint(api_key: &str, api_base_url: &str) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base_url);

        Self {
            client: Client::with_config(openai_config),
        }
    }

    fn build_messages(request: &CompletionRequest) -> AppResult<Vec<ChatCompletionRequestMessage>> {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_message.as_str())
            .build()
            .map_err(|e| build_failed(&request.model, e))?;

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user_message.as_str())
            .build()
            .map_err(|e| build_failed(&request.model, e))?;

        Ok(vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ])
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion> {
        debug!("调用 LLM API，模型: {}", request.model);
        debug!("用户消息长度: {} 字符", request.user_message.len());

        let messages = Self::build_messages(request)?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()
            .map_err(|e| build_failed(&request.model, e))?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&request.model, e)
        })?;

        let usage = response.usage.as_ref().map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        });
        if let Some(usage) = usage {
            debug!(
                "Prompt Tokens: {}, Completion Tokens: {}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                AppError::Llm(LlmError::EmptyContent {
                    model: request.model.clone(),
                })
            })?;

        debug!("LLM API 调用成功");

        Ok(Completion {
            text: content.trim().to_string(),
            usage,
        })
    }
}

fn build_failed(model: &str, source: impl std::error::Error + Send + Sync + 'static) -> AppError {
    AppError::Llm(LlmError::RequestBuildFailed {
        model: model.to_string(),
        source: Box::new(source),
    })
}
