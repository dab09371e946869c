use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use doc_insight::orchestrator::{review_saved_quiz, App};
use doc_insight::utils::logging;
use doc_insight::Config;

/// AI Document Insight Assistant：文档摘要、翻译与测验
#[derive(Parser)]
#[command(name = "doc-insight", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 分析文档 (.pdf, .docx, .png, .jpg, .jpeg, .tiff, .bmp) 并进入测验
    Analyze {
        /// 待分析的文件
        file: PathBuf,
        /// 只分析，不进入测验
        #[arg(long)]
        no_quiz: bool,
    },
    /// 复习已保存的 quiz.json
    Quiz {
        /// quiz.json 路径
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    match cli.command {
        Command::Analyze { file, no_quiz } => {
            let mut app = App::initialize(config)?;
            app.run_analyze(&file, !no_quiz).await?;
        }
        Command::Quiz { path } => review_saved_quiz(&path).await?,
    }

    Ok(())
}
