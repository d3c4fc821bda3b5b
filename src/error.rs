use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误（启动阶段致命）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// LLM 服务错误（单次调用可恢复）
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 文档读取错误（单个文件可恢复）
    #[error("文档错误: {0}")]
    Document(#[from] DocumentError),
    /// 模板解析错误（单次渲染致命）
    #[error("模板错误: {0}")]
    Template(#[from] TemplateError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必需的环境变量不存在
    #[error("环境变量 {var_name} 不存在或为空")]
    EnvVarNotFound { var_name: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 未知的变体名称
    #[error("未知的题目变体: '{label}'")]
    UnknownVariant { label: String },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 请求构建失败
    #[error("LLM 请求构建失败 (模型: {model}): {source}")]
    RequestBuildFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 文档读取错误
#[derive(Debug, Error)]
pub enum DocumentError {
    /// 语料目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// PDF 文本提取失败
    #[error("PDF 文本提取失败 ({path}): {message}")]
    ExtractionFailed { path: String, message: String },
}

/// 模板错误
#[derive(Debug, Error)]
pub enum TemplateError {
    /// 提示词模板缺少槽位值
    #[error("提示词模板 {template} 缺少槽位: {slot}")]
    MissingSlot { template: String, slot: String },
    /// 模板文件不存在
    #[error("模板不存在: {name}")]
    TemplateNotFound { name: String },
    /// 模板引用了未提供的变量
    #[error("模板 {name} 引用了未定义的变量: {detail}")]
    UndefinedVariable { name: String, detail: String },
    /// 其他渲染失败
    #[error("模板 {name} 渲染失败: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 目标文件已存在
    #[error("文件已存在，拒绝覆盖: {path}")]
    AlreadyExists { path: String },
    /// 结果序列化失败
    #[error("结果序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建环境变量缺失错误
    pub fn missing_env(var_name: impl Into<String>) -> Self {
        AppError::Config(ConfigError::EnvVarNotFound {
            var_name: var_name.into(),
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为启动阶段的致命配置错误
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::Serialize(err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
