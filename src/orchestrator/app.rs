//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建唯一的 LLM 客户端并注入到各个服务
//! 2. **输入准备**：文本文件 / PDF 语料 / 内置示例文本
//! 3. **顺序执行**：每段文本跑一次实验，单次失败不影响后续
//! 4. **全局统计**：汇总成功与失败数量

use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::clients::{CompletionBackend, LlmClient};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{load_pdf_documents, ExperimentRecord};
use crate::services::{Evaluator, LlmService, QuestionGenerator};
use crate::utils::{logging, preprocess_documents};
use crate::workflow::ExperimentFlow;

/// 未指定输入时使用的示例文本
pub const SAMPLE_TEXT: &str = "\
1.1 Purpose
Bolivian cities' exposure to natural hazards, mainly floods, flash floods and landslides, combined with rapid
unplanned urbanization, is a huge issue: Bolivia has the second highest economic risk exposure to multiple
hazards worldwide. To improve resilience of its cities, the government has identified key challenges needed to be
addressed.
The project Resilient Bolivian Cities will support the two municipalities of Santa Cruz and La Paz and the central
Government in this quest. This project is financed by SECO to the amount of 4.9 million Swiss francs and is part of
a larger World Bank project with funding of US$ 75 million.
1.2 Eligible organizations/persons
The award procedure chosen is an open international tender. The tendering process is open to institutions and
companies able to implement assignments in the field of landscape architecture in Bolivia.
";

/// 应用主结构
pub struct App {
    config: Config,
    flow: ExperimentFlow,
}

impl App {
    /// 初始化应用（使用真实的 LLM 客户端）
    pub fn initialize(config: Config) -> Self {
        let backend: Arc<dyn CompletionBackend> = Arc::new(LlmClient::new(&config));
        Self::with_backend(config, backend)
    }

    /// 使用指定的补全后端初始化
    pub fn with_backend(config: Config, backend: Arc<dyn CompletionBackend>) -> Self {
        logging::log_startup(&config.llm_model_name, &config.llm_api_key, &config.llm_api_base_url);

        let llm = LlmService::new(backend, config.llm_model_name.clone());
        let generator = QuestionGenerator::new(llm.clone())
            .with_variant_max_tokens(config.max_tokens)
            .with_concurrency(config.concurrent_requests);
        let evaluator = Evaluator::new(llm)
            .with_samples(config.self_consistency_samples)
            .with_concurrency(config.concurrent_requests);
        let flow = ExperimentFlow::new(generator, evaluator, &config.results_dir);

        Self { config, flow }
    }

    /// 先加载配置，成功后才创建补全后端
    ///
    /// 配置缺失时 `make_backend` 不会被调用，也就不会发出任何请求。
    pub fn bootstrap<F, B>(lookup: F, make_backend: B) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
        B: FnOnce(&Config) -> Arc<dyn CompletionBackend>,
    {
        let config = Config::from_lookup(lookup)?;
        let backend = make_backend(&config);
        Ok(Self::with_backend(config, backend))
    }

    pub fn flow(&self) -> &ExperimentFlow {
        &self.flow
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<Vec<ExperimentRecord>> {
        let texts = self.load_texts().await?;
        if texts.is_empty() {
            warn!("⚠️ 没有可用的输入文本，程序结束");
            return Ok(Vec::new());
        }

        info!("✓ 共 {} 段输入文本", texts.len());

        let mut records = Vec::with_capacity(texts.len());
        let mut failed = 0;
        for (idx, text) in texts.iter().enumerate() {
            info!("\n{}", "=".repeat(60));
            info!("🧪 开始第 {}/{} 个实验", idx + 1, texts.len());

            match self
                .flow
                .run_experiment(text, self.config.max_tokens, &self.config.selected_variants)
                .await
            {
                Ok(record) => records.push(record),
                Err(e) => {
                    failed += 1;
                    error!("❌ 第 {} 个实验失败: {}", idx + 1, e);
                }
            }
        }

        info!("{}", "=".repeat(60));
        info!("✅ 成功: {}/{}", records.len(), texts.len());
        info!("❌ 失败: {}", failed);
        info!("{}", "=".repeat(60));

        Ok(records)
    }

    /// 准备输入文本
    ///
    /// 优先级：PDF 语料 > 文本文件 > 内置示例
    async fn load_texts(&self) -> AppResult<Vec<String>> {
        if let Some(dir) = &self.config.pdf_corpus_dir {
            info!("\n📁 正在扫描 PDF 语料: {}", dir);
            let mut documents = load_pdf_documents(dir).await?;
            preprocess_documents(&mut documents);

            let texts = documents
                .into_iter()
                .filter(|doc| !doc.text.trim().is_empty())
                .take(self.config.max_documents)
                .map(|doc| {
                    info!("使用 {} 第 {} 页", doc.file, doc.page);
                    doc.text
                })
                .collect();
            return Ok(texts);
        }

        if let Some(file) = &self.config.source_text_file {
            info!("📄 读取输入文本: {}", file);
            let text = tokio::fs::read_to_string(Path::new(file))
                .await
                .map_err(|e| AppError::file_read_failed(file, e))?;
            return Ok(vec![text]);
        }

        info!("使用内置示例文本");
        Ok(vec![SAMPLE_TEXT.to_string()])
    }
}
