//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责应用生命周期和输入调度。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (准备输入文本，逐个运行实验)
//!     ↓
//! workflow::ExperimentFlow (一段文本的完整实验)
//!     ↓
//! services (能力层：生成 / 评估 / 解析 / LLM)
//!     ↓
//! clients (基础设施：CompletionBackend)
//! ```
//!
//! 只有编排层创建 LLM 客户端，其余各层都通过构造参数拿到它。

pub mod app;

pub use app::{App, SAMPLE_TEXT};
