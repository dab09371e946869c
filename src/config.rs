use crate::error::{AppResult, ConfigError};
use crate::services::DEFAULT_NUM_QUESTIONS;

/// LLM 后端类型
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LlmBackend {
    /// Azure OpenAI（deployment + api-version）
    Azure,
    /// 兼容 OpenAI API 的服务
    OpenAiCompatible,
}

/// 程序配置
///
/// 启动时加载一次，之后只读
#[derive(Clone, Debug)]
pub struct Config {
    // --- 文档识别配置 ---
    pub doc_intel_endpoint: String,
    pub doc_intel_key: String,
    pub doc_intel_model_id: String,
    pub doc_intel_api_version: String,
    /// 轮询分析结果的间隔（毫秒）
    pub doc_intel_poll_interval_ms: u64,
    // --- LLM 配置 ---
    pub llm_backend: LlmBackend,
    pub azure_openai_endpoint: String,
    pub azure_openai_key: String,
    pub azure_openai_deployment: String,
    pub azure_openai_api_version: String,
    pub llm_api_base_url: String,
    pub llm_api_key: String,
    pub llm_model_name: String,
    // --- 输出配置 ---
    /// 分析结果根目录
    pub output_dir: String,
    /// 每次请求生成的题目数量（目标值，不保证）
    pub quiz_num_questions: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            doc_intel_endpoint: String::new(),
            doc_intel_key: String::new(),
            doc_intel_model_id: "prebuilt-read".to_string(),
            doc_intel_api_version: "2024-11-30".to_string(),
            doc_intel_poll_interval_ms: 1000,
            llm_backend: LlmBackend::Azure,
            azure_openai_endpoint: String::new(),
            azure_openai_key: String::new(),
            azure_openai_deployment: String::new(),
            azure_openai_api_version: "2024-10-21".to_string(),
            llm_api_base_url: String::new(),
            llm_api_key: String::new(),
            llm_model_name: String::new(),
            output_dir: "analysis_results".to_string(),
            quiz_num_questions: DEFAULT_NUM_QUESTIONS,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置（会先尝试读取 .env 文件）
    pub fn from_env() -> Self {
        // .env 不存在时直接使用已有环境变量
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过任意查找函数加载配置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let llm_api_base_url = var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url);
        let llm_backend = if llm_api_base_url.is_empty() {
            LlmBackend::Azure
        } else {
            LlmBackend::OpenAiCompatible
        };

        Self {
            doc_intel_endpoint: var("AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT").unwrap_or(default.doc_intel_endpoint),
            doc_intel_key: var("AZURE_DOCUMENT_INTELLIGENCE_KEY").unwrap_or(default.doc_intel_key),
            doc_intel_model_id: var("DOC_INTEL_MODEL_ID").unwrap_or(default.doc_intel_model_id),
            doc_intel_api_version: var("DOC_INTEL_API_VERSION").unwrap_or(default.doc_intel_api_version),
            doc_intel_poll_interval_ms: var("DOC_INTEL_POLL_INTERVAL_MS").and_then(|v| v.parse().ok()).unwrap_or(default.doc_intel_poll_interval_ms),
            llm_backend,
            azure_openai_endpoint: var("AZURE_OPENAI_ENDPOINT").unwrap_or(default.azure_openai_endpoint),
            azure_openai_key: var("AZURE_OPENAI_KEY")
                .or_else(|| var("AZURE_OPENAI_API_KEY"))
                .unwrap_or(default.azure_openai_key),
            azure_openai_deployment: var("AZURE_OPENAI_DEPLOYMENT").unwrap_or(default.azure_openai_deployment),
            azure_openai_api_version: var("AZURE_OPENAI_API_VERSION").unwrap_or(default.azure_openai_api_version),
            llm_api_base_url,
            llm_api_key: var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_model_name: var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            output_dir: var("OUTPUT_DIR").unwrap_or(default.output_dir),
            quiz_num_questions: var("QUIZ_NUM_QUESTIONS").and_then(|v| v.parse().ok()).unwrap_or(default.quiz_num_questions),
            verbose_logging: var("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 检查必需的配置项，一次性列出所有缺失的环境变量
    pub fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();

        if self.doc_intel_endpoint.is_empty() {
            missing.push("AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT");
        }
        if self.doc_intel_key.is_empty() {
            missing.push("AZURE_DOCUMENT_INTELLIGENCE_KEY");
        }

        match self.llm_backend {
            LlmBackend::Azure => {
                if self.azure_openai_endpoint.is_empty() {
                    missing.push("AZURE_OPENAI_ENDPOINT");
                }
                if self.azure_openai_key.is_empty() {
                    missing.push("AZURE_OPENAI_KEY or AZURE_OPENAI_API_KEY");
                }
                if self.azure_openai_deployment.is_empty() {
                    missing.push("AZURE_OPENAI_DEPLOYMENT");
                }
            }
            LlmBackend::OpenAiCompatible => {
                if self.llm_api_key.is_empty() {
                    missing.push("LLM_API_KEY");
                }
                if self.llm_model_name.is_empty() {
                    missing.push("LLM_MODEL_NAME");
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingEnvVars {
                var_names: missing.into_iter().map(String::from).collect(),
            }
            .into())
        }
    }

    /// 当前使用的模型名（Azure 下为 deployment 名）
    pub fn model_name(&self) -> &str {
        match self.llm_backend {
            LlmBackend::Azure => &self.azure_openai_deployment,
            LlmBackend::OpenAiCompatible => &self.llm_model_name,
        }
    }
}
