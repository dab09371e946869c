//! 文档识别客户端 - 基础设施层
//!
//! 封装 Azure Document Intelligence REST 协议，只暴露"提取文本"能力

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, ExtractionError};

/// 支持的文件扩展名
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "png", "jpg", "jpeg", "tiff", "bmp"];

/// 文本提取能力
///
/// 输入文件路径，返回纯文本。失败直接向上传播。
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, file_path: &Path) -> AppResult<String>;
}

/// 检查文件扩展名是否受支持（不区分大小写）
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// 分析任务状态
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    #[serde(default)]
    analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// 分析结果（只保留用到的字段）
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeResult {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub pages: Vec<AnalyzedPage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzedPage {
    #[serde(default)]
    pub lines: Vec<AnalyzedLine>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzedLine {
    #[serde(default)]
    pub content: String,
}

impl AnalyzeResult {
    /// 按页、按行拼接文本；没有行信息时退回整体 content
    pub fn to_text(&self) -> String {
        let lines: Vec<&str> = self
            .pages
            .iter()
            .flat_map(|page| page.lines.iter())
            .map(|line| line.content.as_str())
            .collect();

        if lines.is_empty() {
            self.content.clone().unwrap_or_default()
        } else {
            lines.join("\n")
        }
    }
}

/// Azure Document Intelligence 客户端
pub struct DocumentIntelligenceClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model_id: String,
    api_version: String,
    poll_interval: Duration,
}

impl DocumentIntelligenceClient {
    /// 创建新的文档识别客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.doc_intel_endpoint.trim_end_matches('/').to_string(),
            api_key: config.doc_intel_key.clone(),
            model_id: config.doc_intel_model_id.clone(),
            api_version: config.doc_intel_api_version.clone(),
            poll_interval: Duration::from_millis(config.doc_intel_poll_interval_ms),
        }
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}",
            self.endpoint, self.model_id, self.api_version
        )
    }

    /// 提交文档，返回 Operation-Location
    async fn submit(&self, bytes: Vec<u8>) -> AppResult<String> {
        let url = self.analyze_url();

        let res = self
            .http
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::extraction_request_failed(&url, e))?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ExtractionError::BadResponse {
                endpoint: url,
                status,
                body,
            }
            .into());
        }

        let location = res
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(ExtractionError::MissingOperationLocation)?;

        Ok(location)
    }

    /// 轮询分析结果直到成功或失败
    async fn poll(&self, location: &str) -> AppResult<AnalyzeResult> {
        loop {
            let res = self
                .http
                .get(location)
                .header("Ocp-Apim-Subscription-Key", &self.api_key)
                .send()
                .await
                .map_err(|e| AppError::extraction_request_failed(location, e))?;

            if !res.status().is_success() {
                let status = res.status().as_u16();
                let body = res.text().await.unwrap_or_default();
                return Err(ExtractionError::BadResponse {
                    endpoint: location.to_string(),
                    status,
                    body,
                }
                .into());
            }

            let operation: AnalyzeOperation = res
                .json()
                .await
                .map_err(|e| AppError::extraction_request_failed(location, e))?;

            debug!("文档分析状态: {}", operation.status);

            match operation.status.as_str() {
                "succeeded" => return Ok(operation.analyze_result.unwrap_or_default()),
                "failed" | "canceled" => {
                    let message = operation
                        .error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| operation.status.clone());
                    return Err(ExtractionError::AnalysisFailed { message }.into());
                }
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}

#[async_trait]
impl TextExtractor for DocumentIntelligenceClient {
    async fn extract_text(&self, file_path: &Path) -> AppResult<String> {
        let path_str = file_path.display().to_string();

        if !is_supported_file(file_path) {
            return Err(ExtractionError::UnsupportedFormat { path: path_str }.into());
        }

        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|source| ExtractionError::ReadFailed {
                path: path_str.clone(),
                source,
            })?;

        info!("📄 提交文档识别: {} ({} 字节)", path_str, bytes.len());

        let location = self.submit(bytes).await?;
        let result = self.poll(&location).await?;
        let text = result.to_text();

        info!("✓ 文档识别完成，提取 {} 个字符", text.chars().count());

        Ok(text)
    }
}
