//! # Doc Insight
//!
//! 一个把文档变成考试摘要、译文和选择题测验的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有外部服务连接，只暴露能力
//! - `TextExtractor` / `DocumentIntelligenceClient` - 文档识别（OCR）
//! - `CompletionService` / `LlmClient` - 对话补全
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `SummaryService` - 生成考试摘要
//! - `TranslationService` - 翻译摘要
//! - `QuizService` - 出题并宽松解析 LLM 响应
//! - `ArtifactStore` - 保存分析产物
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份文档"和"一次测验"的完整流程
//! - `AnalysisFlow` - 流程编排（提取 → 摘要 → 翻译 → 出题 → 打乱 → 保存）
//! - `QuizSession` - 测验状态机（开始 / 跳转 / 作答）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用装配，依赖注入
//! - `orchestrator/quiz_console` - 终端测验界面
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ChatMessage, CompletionService, TextExtractor};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnalysisResult, Quiz, QuizItem};
pub use orchestrator::App;
pub use workflow::{AnalysisFlow, QuizSession, QuizView};
