//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、创建外部服务客户端
//! 2. **依赖注入**：把客户端交给 `AnalysisFlow`，不使用全局单例
//! 3. **会话管理**：每次分析完成后用新测验替换会话
//! 4. **界面调度**：把结果交给终端测验界面

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::clients::{CompletionService, DocumentIntelligenceClient, LlmClient, TextExtractor};
use crate::config::Config;
use crate::models::AnalysisResult;
use crate::orchestrator::quiz_console::QuizConsole;
use crate::services::load_quiz;
use crate::utils::logging::{log_analysis_complete, log_startup};
use crate::workflow::{AnalysisFlow, QuizSession};

/// 应用主结构
pub struct App {
    flow: AnalysisFlow,
    session: QuizSession,
}

impl App {
    /// 用真实的外部服务初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        log_startup(&config);

        let extractor: Arc<dyn TextExtractor> = Arc::new(DocumentIntelligenceClient::new(&config));
        let llm: Arc<dyn CompletionService> = Arc::new(LlmClient::new(&config));

        Ok(Self::with_services(extractor, llm, &config))
    }

    /// 使用指定的外部服务创建应用
    pub fn with_services(
        extractor: Arc<dyn TextExtractor>,
        llm: Arc<dyn CompletionService>,
        config: &Config,
    ) -> Self {
        Self {
            flow: AnalysisFlow::new(extractor, llm, config),
            session: QuizSession::empty(),
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// 分析文档，并用新测验替换当前会话
    pub async fn analyze(&mut self, file: &Path) -> Result<AnalysisResult> {
        let result = self
            .flow
            .analyze(file)
            .await
            .with_context(|| format!("分析文档失败: {}", file.display()))?;

        log_analysis_complete(&result);
        self.session = QuizSession::new(Arc::new(result.quiz.clone()));

        Ok(result)
    }

    /// 分析文档、打印结果，然后进入测验
    pub async fn run_analyze(&mut self, file: &Path, with_quiz: bool) -> Result<()> {
        let result = self.analyze(file).await?;

        println!("\n=== SUMMARY (EN) ===\n\n{}", result.summary);
        println!("\n=== TRANSLATION (PL) ===\n\n{}", result.translation);
        println!("\nFolder with results: {}", result.output_folder.display());

        if with_quiz {
            self.run_quiz().await?;
        }
        Ok(())
    }

    /// 进入当前会话的终端测验
    pub async fn run_quiz(&mut self) -> Result<()> {
        let mut console = QuizConsole::new(std::mem::take(&mut self.session));
        console.run().await?;
        self.session = console.session().clone();
        Ok(())
    }
}

/// 复习已保存的 quiz.json（不需要外部服务）
pub async fn review_saved_quiz(path: &Path) -> Result<()> {
    let quiz = load_quiz(path).with_context(|| format!("加载测验失败: {}", path.display()))?;
    info!("📋 已加载 {} 道题目: {}", quiz.len(), path.display());

    let mut console = QuizConsole::new(QuizSession::new(Arc::new(quiz)));
    console.run().await
}
