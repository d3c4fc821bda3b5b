//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use anyhow::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::models::ExperimentRecord;

/// 初始化日志：控制台 + 追加写入日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// 日志级别由 `RUST_LOG` 控制，默认 `info`。
pub fn init(log_file_path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()?;

    Ok(())
}

/// 记录程序启动信息
///
/// 密钥只输出前四位。
pub fn log_startup(model: &str, api_key: &str, api_base_url: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - MCQ 生成与评估实验");
    info!("🤖 模型: {}", model);
    info!("🔑 API Key: {}", mask_secret(api_key));
    info!("🌐 Base URL: {}", api_base_url);
    info!("{}", "=".repeat(60));
}

/// 打印实验结果摘要
pub fn log_experiment_summary(record: &ExperimentRecord, result_file: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📊 实验完成");
    info!(
        "基础题: {}",
        record
            .base_mcq_with_answer
            .as_deref()
            .map(|mcq| truncate_text(mcq, 80))
            .unwrap_or_else(|| "<null>".to_string())
    );
    info!(
        "变体: {}",
        record
            .variants
            .keys()
            .map(|kind| kind.label())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("失败条目: {}", record.failure_count());
    info!("结果文件: {}", result_file);
    info!("{}", "─".repeat(60));
}

/// 密钥脱敏：只保留前四个字符
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{}... (truncated)", prefix)
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
