#![allow(dead_code)]

use async_trait::async_trait;
use mcq_experiment::clients::{Completion, CompletionBackend, CompletionRequest, TokenUsage};
use mcq_experiment::{AppError, AppResult};
use std::sync::{Arc, Mutex};

type Handler = Box<dyn Fn(usize, &CompletionRequest) -> Option<String> + Send + Sync>;

/// 脚本化的补全后端：按调用序号和请求内容决定回复，返回 `None` 表示调用失败
pub struct StubBackend {
    handler: Handler,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubBackend {
    pub fn scripted<F>(handler: F) -> Arc<Self>
    where
        F: Fn(usize, &CompletionRequest) -> Option<String> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// 总是返回同一段文本
    pub fn always(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::scripted(move |_, _| Some(text.clone()))
    }

    /// 所有调用都失败
    pub fn failing() -> Arc<Self> {
        Self::scripted(|_, _| None)
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for StubBackend {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };

        match (self.handler)(index, request) {
            Some(text) => Ok(Completion {
                text,
                usage: Some(TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                }),
            }),
            None => Err(AppError::llm_api_failed(
                &request.model,
                std::io::Error::new(std::io::ErrorKind::Other, "stub failure"),
            )),
        }
    }
}
