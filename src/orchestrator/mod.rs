//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责进程级的装配和界面调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用
//! - 校验配置，创建文档识别和 LLM 客户端
//! - 把客户端注入 `AnalysisFlow`
//! - 持有当前的 `QuizSession`，新分析完成后整体替换
//!
//! ### `quiz_console` - 终端测验界面
//! - 解析用户命令
//! - 调用 `QuizSession` 的 start / navigate / answer
//! - 渲染题目和判定结果
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (App / QuizConsole)
//!     ↓
//! workflow (AnalysisFlow / QuizSession)
//!     ↓
//! services (能力层：summary / translation / quiz / artifact)
//!     ↓
//! clients (基础设施：文档识别 / LLM)
//! ```

pub mod app;
pub mod quiz_console;

pub use app::{review_saved_quiz, App};
pub use quiz_console::{parse_command, QuizCommand, QuizConsole};
