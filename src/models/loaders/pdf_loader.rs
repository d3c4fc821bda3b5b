use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{AppResult, DocumentError};
use crate::models::SourceDocument;

/// 单个 PDF 的逐页文本提取
pub trait PageTextExtractor: Send + Sync {
    /// 按页序返回每页文本
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, DocumentError>;
}

/// 基于 `pdf-extract` 的提取器
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PageTextExtractor for PdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, DocumentError> {
        let failed = |message: String| DocumentError::ExtractionFailed {
            path: path.display().to_string(),
            message,
        };

        let bytes = std::fs::read(path).map_err(|e| failed(e.to_string()))?;

        // pdf-extract 遇到某些损坏文件会 panic
        match panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })) {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(failed(e.to_string())),
            Err(_) => Err(failed("解析器异常退出".to_string())),
        }
    }
}

/// PDF 语料目录
pub struct PdfCorpus<E = PdfExtractor> {
    root: PathBuf,
    extractor: E,
}

impl PdfCorpus<PdfExtractor> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extractor(root, PdfExtractor)
    }
}

impl<E: PageTextExtractor> PdfCorpus<E> {
    pub fn with_extractor(root: impl Into<PathBuf>, extractor: E) -> Self {
        Self {
            root: root.into(),
            extractor,
        }
    }

    /// 递归查找所有 PDF 文件（按路径排序）
    pub fn discover(&self) -> AppResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(DocumentError::DirectoryNotFound {
                path: self.root.display().to_string(),
            }
            .into());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("跳过无法访问的路径: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_pdf(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }

    /// 提取所有 PDF 的逐页文本
    ///
    /// 单个文件失败只记录日志并跳过，不影响其余文件。
    pub fn extract_documents(&self) -> AppResult<Vec<SourceDocument>> {
        let paths = self.discover()?;
        let total = paths.len();
        info!("📁 找到 {} 个 PDF 文件", total);

        let mut documents = Vec::new();
        let mut failed = 0;

        for (idx, path) in paths.iter().enumerate() {
            let relative = path
                .strip_prefix(&self.root)
                .unwrap_or(path)
                .to_string_lossy()
                .to_string();

            match self.extractor.extract_pages(path) {
                Ok(pages) => {
                    info!("[{}/{}] ✓ {} ({} 页)", idx + 1, total, relative, pages.len());
                    documents.extend(
                        pages
                            .into_iter()
                            .enumerate()
                            .map(|(page_idx, text)| SourceDocument::new(relative.clone(), page_idx + 1, text)),
                    );
                }
                Err(e) => {
                    failed += 1;
                    warn!("[{}/{}] ⚠️ 处理失败，已跳过: {}", idx + 1, total, e);
                }
            }
        }

        info!("共提取 {} 页，失败文件 {} 个", documents.len(), failed);
        Ok(documents)
    }
}

/// 在阻塞线程中加载整个语料目录
pub async fn load_pdf_documents(root: &str) -> AppResult<Vec<SourceDocument>> {
    let root_path = root.to_string();
    tokio::task::spawn_blocking(move || PdfCorpus::new(root_path).extract_documents())
        .await
        .map_err(|e| DocumentError::ExtractionFailed {
            path: root.to_string(),
            message: e.to_string(),
        })?
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
