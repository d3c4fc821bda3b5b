//! 实验流程 - 流程层
//!
//! 核心职责：定义"一段文本"的完整实验流程
//!
//! 流程顺序：
//! 1. 生成带答案的基础题 → 去掉答案行
//! 2. 生成请求的变体
//! 3. 对基础题和每个变体做 CoT + 自洽性评估
//! 4. 组装结果并写入带时间戳的 JSON 文件

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, FileError};
use crate::models::{EvaluationResult, ExperimentRecord, QuestionLabel, VariantKind, VariantPayload, VariantSet};
use crate::services::{Evaluator, QuestionGenerator};
use crate::utils::logging;

/// 结果文件名前缀
pub const RESULT_FILE_PREFIX: &str = "mcq_experiment_results_";

/// 实验流程
///
/// - 按顺序编排生成与评估
/// - 不持有任何远程资源，只依赖注入的服务
pub struct ExperimentFlow {
    generator: QuestionGenerator,
    evaluator: Evaluator,
    results_dir: PathBuf,
}

impl ExperimentFlow {
    pub fn new(generator: QuestionGenerator, evaluator: Evaluator, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            evaluator,
            results_dir: results_dir.into(),
        }
    }

    /// 运行一次实验并保存结果
    ///
    /// # 参数
    /// - `text`: 原始文本
    /// - `max_tokens`: 变体生成请求的 token 上限
    /// - `kinds`: 需要生成的变体
    pub async fn run_experiment(
        &self,
        text: &str,
        max_tokens: u32,
        kinds: &[VariantKind],
    ) -> AppResult<ExperimentRecord> {
        let record = self.build_record(text, max_tokens, kinds).await?;
        let path = save_results_to_file(&record, &self.results_dir)?;
        logging::log_experiment_summary(&record, &path.display().to_string());
        Ok(record)
    }

    /// 生成并评估，但不写文件
    pub async fn build_record(
        &self,
        text: &str,
        max_tokens: u32,
        kinds: &[VariantKind],
    ) -> AppResult<ExperimentRecord> {
        let generator = self.generator.clone().with_variant_max_tokens(max_tokens);

        let Some(base_mcq_with_answer) = generator.generate_base_with_answer(text).await? else {
            warn!("⚠️ 基础题生成失败，变体与评估全部记为 null");
            return Ok(self.missing_record(kinds));
        };

        let question = generator.extract_question(&base_mcq_with_answer);
        let variants = generator.generate_variants(text, &question, kinds).await?;

        let mut evaluations = BTreeMap::new();
        info!("📋 正在评估: {}", QuestionLabel::Base);
        evaluations.insert(QuestionLabel::Base, self.evaluator.evaluate(text, &question).await?);

        for (kind, payload) in &variants {
            info!("📋 正在评估: {}", kind);
            let evaluation = match payload.question_text() {
                Some(variant_question) => self.evaluator.evaluate(text, &variant_question).await?,
                None => {
                    warn!("⚠️ 变体 {} 生成失败，跳过评估", kind);
                    EvaluationResult::missing(self.evaluator.samples())
                }
            };
            evaluations.insert(QuestionLabel::from(*kind), evaluation);
        }

        Ok(ExperimentRecord {
            base_mcq_with_answer: Some(base_mcq_with_answer),
            variants,
            evaluations,
        })
    }

    /// 基础题失败时的记录：请求的每个变体和每项评估都为 null，不再发起请求
    fn missing_record(&self, kinds: &[VariantKind]) -> ExperimentRecord {
        let variants: VariantSet = kinds.iter().map(|kind| (*kind, VariantPayload::missing())).collect();

        let evaluations = std::iter::once(QuestionLabel::Base)
            .chain(variants.keys().copied().map(QuestionLabel::from))
            .map(|label| (label, EvaluationResult::missing(self.evaluator.samples())))
            .collect();

        ExperimentRecord {
            base_mcq_with_answer: None,
            variants,
            evaluations,
        }
    }
}

/// 同一秒内文件名冲突时最多尝试的后缀数量
const MAX_NAME_ATTEMPTS: usize = 100;

/// 结果文件名：`mcq_experiment_results_<YYYYMMDD>_<HHMMSS>.json`
///
/// `attempt > 0` 时追加 `_<attempt>` 后缀。
pub fn result_file_name(now: chrono::DateTime<chrono::Local>, attempt: usize) -> String {
    let stem = format!("{}{}", RESULT_FILE_PREFIX, now.format("%Y%m%d_%H%M%S"));
    if attempt == 0 {
        format!("{}.json", stem)
    } else {
        format!("{}_{}.json", stem, attempt)
    }
}

/// 把记录写入结果目录（使用当前本地时间命名）
pub fn save_results_to_file(record: &ExperimentRecord, dir: &Path) -> AppResult<PathBuf> {
    save_results_at(record, dir, chrono::Local::now())
}

/// 把记录写入结果目录
///
/// 先写临时文件再原子重命名；任何一步失败都不会留下结果文件。
/// 已有文件不会被覆盖，同名时改用 `_1`、`_2` ... 后缀。
pub fn save_results_at(
    record: &ExperimentRecord,
    dir: &Path,
    now: chrono::DateTime<chrono::Local>,
) -> AppResult<PathBuf> {
    let dir_str = dir.display().to_string();
    std::fs::create_dir_all(dir).map_err(|e| AppError::file_write_failed(&dir_str, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| AppError::file_write_failed(&dir_str, e))?;

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut tmp, formatter);
    record.serialize(&mut serializer)?;
    tmp.write_all(b"\n")
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| AppError::file_write_failed(&dir_str, e))?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(result_file_name(now, attempt));
        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                info!("💾 结果已保存至 {}", path.display());
                return Ok(path);
            }
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!("文件已存在，换用下一个后缀: {}", path.display());
                tmp = e.file;
            }
            Err(e) => return Err(AppError::file_write_failed(path.display().to_string(), e.error)),
        }
    }

    Err(AppError::File(FileError::AlreadyExists {
        path: dir.join(result_file_name(now, 0)).display().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_result_file_name_pattern() {
        let now = chrono::Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(result_file_name(now, 0), "mcq_experiment_results_20240309_070501.json");
        assert_eq!(result_file_name(now, 2), "mcq_experiment_results_20240309_070501_2.json");
    }

    fn empty_record(base: &str) -> ExperimentRecord {
        ExperimentRecord {
            base_mcq_with_answer: Some(base.to_string()),
            variants: VariantSet::new(),
            evaluations: BTreeMap::new(),
        }
    }

    #[test]
    fn test_save_writes_indented_json() {
        let dir = tempfile::tempdir().unwrap();

        let path = save_results_to_file(&empty_record("Q"), dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(RESULT_FILE_PREFIX));
        assert!(name.ends_with(".json"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n    \"Base MCQ with Answer\": \"Q\""));

        // 只留下结果文件，没有临时文件残留
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_same_second_saves_get_suffixes_and_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let now = chrono::Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();

        let first = save_results_at(&empty_record("first"), dir.path(), now).unwrap();
        let second = save_results_at(&empty_record("second"), dir.path(), now).unwrap();
        let third = save_results_at(&empty_record("third"), dir.path(), now).unwrap();

        assert_eq!(first, dir.path().join("mcq_experiment_results_20240309_070501.json"));
        assert_eq!(second, dir.path().join("mcq_experiment_results_20240309_070501_1.json"));
        assert_eq!(third, dir.path().join("mcq_experiment_results_20240309_070501_2.json"));

        assert!(std::fs::read_to_string(&first).unwrap().contains("\"first\""));
        assert!(std::fs::read_to_string(&second).unwrap().contains("\"second\""));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }
}
