/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::AnalysisResult;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`；未设置时默认 `info`，详细模式下为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 文档分析助手");
    info!("🤖 模型: {} ({:?})", config.model_name(), config.llm_backend);
    info!("📁 输出目录: {}", config.output_dir);
    info!("{}", "=".repeat(60));
}

/// 记录分析完成信息
pub fn log_analysis_complete(result: &AnalysisResult) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 分析完成");
    info!("📝 摘要: {} 个字符", result.summary.chars().count());
    info!("🌐 译文: {} 个字符", result.translation.chars().count());
    info!("🎯 题目: {} 道", result.quiz.len());
    info!("💾 结果目录: {}", result.output_folder.display());
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
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
