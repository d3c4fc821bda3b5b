use serde::{Deserialize, Serialize};

/// PDF 中单页的文本记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// 相对于语料根目录的文件路径
    pub file: String,
    /// 页码（从1开始）
    pub page: usize,
    /// 页面文本
    pub text: String,
}

impl SourceDocument {
    pub fn new(file: impl Into<String>, page: usize, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            page,
            text: text.into(),
        }
    }
}
