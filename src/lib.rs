//! # MCQ Experiment
//!
//! 用 LLM 从文本生成选择题、构造结构化变体并评估的实验工具
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - `CompletionBackend` 抽象与基于 async-openai 的 `LlmClient`
//!
//! ### ② 业务能力层（Services）
//! - `LlmService` - 发送单个提示词，失败记为 `None`
//! - `QuestionGenerator` - 基础题与变体生成
//! - `Evaluator` - CoT 与自洽性评估
//! - `mcq_parser` / `prompts` - 文本解析与提示词模板
//!
//! ### ③ 流程层（Workflow）
//! - `ExperimentFlow` - 生成 → 变体 → 评估 → 保存
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 初始化、准备输入、逐个运行实验
//!
//! 另有与主流程无关的 `renderer`（模板渲染）和 `models::loaders`（PDF 文本提取）。

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod renderer;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{CompletionBackend, LlmClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{EvaluationResult, ExperimentRecord, SourceDocument, VariantKind, VariantPayload};
pub use orchestrator::App;
pub use workflow::ExperimentFlow;
