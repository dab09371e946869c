use std::path::PathBuf;

use crate::models::Quiz;

/// 一次文档分析的全部产出
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// 英文考试摘要
    pub summary: String,
    /// 摘要译文
    pub translation: String,
    /// 选项已打乱的测验
    pub quiz: Quiz,
    /// 本次分析的输出目录
    pub output_folder: PathBuf,
}
