//! 文档模板渲染
//!
//! 与 MCQ 流程无关的独立工具：用模板目录中的模板文件和上下文渲染文档。
//!
//! - 模板只能从给定目录中加载，包含 `..` 的路径无法解析
//! - 默认对所有替换值做 HTML 转义
//! - 未定义变量严格报错（`UndefinedBehavior::Strict`）

use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::TemplateError;

/// 转义策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapeMode {
    /// 始终 HTML 转义
    #[default]
    Always,
    /// 按扩展名决定（`.html` `.htm` `.xml` 转义）
    ByExtension,
    /// 不转义
    Never,
}

/// 模板渲染器
pub struct DocumentRenderer {
    env: Environment<'static>,
    template_dir: PathBuf,
}

impl DocumentRenderer {
    /// 以严格模式、默认转义创建渲染器
    pub fn new(template_dir: impl AsRef<Path>) -> Self {
        Self::with_escape_mode(template_dir, EscapeMode::default())
    }

    pub fn with_escape_mode(template_dir: impl AsRef<Path>, mode: EscapeMode) -> Self {
        let template_dir = template_dir.as_ref().to_path_buf();

        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(&template_dir));
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(move |name: &str| match mode {
            EscapeMode::Always => AutoEscape::Html,
            EscapeMode::ByExtension => minijinja::default_auto_escape_callback(name),
            EscapeMode::Never => AutoEscape::None,
        });

        Self { env, template_dir }
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// 渲染模板
    pub fn render<C: Serialize>(&self, template_file: &str, context: &C) -> Result<String, TemplateError> {
        debug!("渲染模板: {} (目录: {})", template_file, self.template_dir.display());

        let template = self
            .env
            .get_template(template_file)
            .map_err(|e| map_error(template_file, e))?;

        template.render(context).map_err(|e| map_error(template_file, e))
    }
}

/// 一次性渲染
pub fn render<C: Serialize>(
    template_file: &str,
    context: &C,
    template_dir: impl AsRef<Path>,
) -> Result<String, TemplateError> {
    DocumentRenderer::new(template_dir).render(template_file, context)
}

fn map_error(name: &str, err: minijinja::Error) -> TemplateError {
    match err.kind() {
        ErrorKind::TemplateNotFound => TemplateError::TemplateNotFound {
            name: name.to_string(),
        },
        ErrorKind::UndefinedError => TemplateError::UndefinedVariable {
            name: name.to_string(),
            detail: err.to_string(),
        },
        _ => TemplateError::Render {
            name: name.to_string(),
            source: err,
        },
    }
}
