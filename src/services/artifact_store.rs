//! 分析结果存储服务 - 业务能力层
//!
//! 只负责"把一次分析的产物写到磁盘 / 读回测验"能力，不关心流程
//!
//! 目录结构：
//!
//! ```text
//! <output_root>/analysis_<YYYYMMDD_HHMMSS>/
//!     <原始文件名>
//!     summary_and_translation.txt
//!     quiz.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{AppResult, FileError};
use crate::models::Quiz;

pub const SUMMARY_FILE_NAME: &str = "summary_and_translation.txt";
pub const QUIZ_FILE_NAME: &str = "quiz.json";

const SUMMARY_HEADER: &str = "=== SUMMARY (EN) ===";
const TRANSLATION_HEADER: &str = "=== TRANSLATION (PL) ===";

/// 分析结果存储服务
pub struct ArtifactStore {
    output_root: PathBuf,
}

impl ArtifactStore {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// 创建本次分析的输出目录
    ///
    /// 目录名精确到秒，同一秒内完成的两次分析会写入同一目录
    pub fn create_analysis_dir(&self) -> AppResult<PathBuf> {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let dir = self.output_root.join(format!("analysis_{}", timestamp));

        fs::create_dir_all(&dir).map_err(|source| FileError::CreateDirFailed {
            path: dir.display().to_string(),
            source,
        })?;

        debug!("创建输出目录: {}", dir.display());
        Ok(dir)
    }

    /// 复制原始文件（保留文件名）
    pub fn copy_original(&self, dir: &Path, original: &Path) -> AppResult<PathBuf> {
        let file_name = original.file_name().ok_or_else(|| FileError::InvalidPath {
            path: original.display().to_string(),
        })?;
        let target = dir.join(file_name);

        fs::copy(original, &target).map_err(|source| FileError::CopyFailed {
            path: original.display().to_string(),
            source,
        })?;

        Ok(target)
    }

    /// 写入摘要和译文
    pub fn write_summary(&self, dir: &Path, summary: &str, translation: &str) -> AppResult<PathBuf> {
        let path = dir.join(SUMMARY_FILE_NAME);
        fs::write(&path, render_summary_file(summary, translation)).map_err(|source| {
            FileError::WriteFailed {
                path: path.display().to_string(),
                source,
            }
        })?;
        Ok(path)
    }

    /// 写入测验 JSON（缩进格式，非 ASCII 字符原样保留）
    pub fn write_quiz(&self, dir: &Path, quiz: &Quiz) -> AppResult<PathBuf> {
        let path = dir.join(QUIZ_FILE_NAME);
        let json = serde_json::to_string_pretty(quiz).map_err(|source| FileError::JsonFailed {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| FileError::WriteFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }

    /// 保存一次分析的全部产物，返回输出目录
    pub fn persist(
        &self,
        original: &Path,
        summary: &str,
        translation: &str,
        quiz: &Quiz,
    ) -> AppResult<PathBuf> {
        let dir = self.create_analysis_dir()?;
        self.copy_original(&dir, original)?;
        self.write_summary(&dir, summary, translation)?;
        self.write_quiz(&dir, quiz)?;

        info!("💾 分析结果已保存至: {}", dir.display());
        Ok(dir)
    }
}

/// 读回保存的 quiz.json
pub fn load_quiz(path: &Path) -> AppResult<Quiz> {
    let text = fs::read_to_string(path).map_err(|source| FileError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;
    let quiz = serde_json::from_str(&text).map_err(|source| FileError::JsonFailed {
        path: path.display().to_string(),
        source,
    })?;
    Ok(quiz)
}

fn render_summary_file(summary: &str, translation: &str) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\n{}",
        SUMMARY_HEADER, summary, TRANSLATION_HEADER, translation
    )
}
