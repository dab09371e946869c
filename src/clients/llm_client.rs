//! LLM API 客户端 - 基础设施层
//!
//! 只暴露"对话补全"能力，不关心提示词内容
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持 Azure OpenAI（deployment + api-version）
//! - 兼容 OpenAI API 的服务（通过自定义 api_base）

use async_openai::{
    config::{AzureConfig, OpenAIConfig},
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{Config, LlmBackend};
use crate::error::{AppError, AppResult, LlmError};

/// 消息角色，对应补全接口中三种带角色的消息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// 一条带角色的对话消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// 助手消息：`complete` 接受任意角色的有序消息列表，
    /// 可用于在提示中附带示例回答（few-shot）
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// 对话补全能力
///
/// 输入有序消息列表和采样参数，返回单条文本（已去除首尾空白）。
/// 失败直接向上传播，不做重试。
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> AppResult<String>;
}

enum Backend {
    Azure(Client<AzureConfig>),
    OpenAi(Client<OpenAIConfig>),
}

/// LLM 客户端
pub struct LlmClient {
    backend: Backend,
    model_name: String,
}

impl LlmClient {
    /// 根据配置创建 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let backend = match config.llm_backend {
            LlmBackend::Azure => {
                let azure_config = AzureConfig::new()
                    .with_api_base(&config.azure_openai_endpoint)
                    .with_api_key(&config.azure_openai_key)
                    .with_deployment_id(&config.azure_openai_deployment)
                    .with_api_version(&config.azure_openai_api_version);
                Backend::Azure(Client::with_config(azure_config))
            }
            LlmBackend::OpenAiCompatible => {
                let openai_config = OpenAIConfig::new()
                    .with_api_key(&config.llm_api_key)
                    .with_api_base(&config.llm_api_base_url);
                Backend::OpenAi(Client::with_config(openai_config))
            }
        };

        Self {
            backend,
            model_name: config.model_name().to_string(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn build_messages(messages: &[ChatMessage]) -> AppResult<Vec<ChatCompletionRequestMessage>> {
        let mut request_messages = Vec::with_capacity(messages.len());

        for message in messages {
            let request_message = match message.role {
                ChatRole::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(message.content.as_str())
                        .build()
                        .map_err(|e| LlmError::RequestBuild(e.to_string()))?,
                ),
                ChatRole::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(message.content.as_str())
                        .build()
                        .map_err(|e| LlmError::RequestBuild(e.to_string()))?,
                ),
                ChatRole::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(message.content.as_str())
                        .build()
                        .map_err(|e| LlmError::RequestBuild(e.to_string()))?,
                ),
            };
            request_messages.push(request_message);
        }

        Ok(request_messages)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        temperature: f32,
    ) -> AppResult<String> {
        debug!(
            "调用 LLM API，模型: {}，消息数: {}，max_tokens: {}，temperature: {}",
            self.model_name,
            messages.len(),
            max_tokens,
            temperature
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(Self::build_messages(messages)?)
            .temperature(temperature)
            .max_tokens(max_tokens)
            .build()
            .map_err(|e| LlmError::RequestBuild(e.to_string()))?;

        let response = match &self.backend {
            Backend::Azure(client) => client.chat().create(request).await,
            Backend::OpenAi(client) => client.chat().create(request).await,
        }
        .map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_messages_keeps_order_and_roles() {
        let messages = vec![
            ChatMessage::system("你是助手"),
            ChatMessage::user("你好"),
            ChatMessage::assistant("你好！"),
        ];
        let built = LlmClient::build_messages(&messages).unwrap();
        assert_eq!(built.len(), 3);
        assert!(matches!(built[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(built[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(built[2], ChatCompletionRequestMessage::Assistant(_)));
    }

    #[test]
    fn test_model_name_follows_backend() {
        let config = Config {
            azure_openai_deployment: "gpt-4o-exam".to_string(),
            ..Config::default()
        };
        assert_eq!(LlmClient::new(&config).model_name(), "gpt-4o-exam");
    }

    /// 测试真实 LLM 调用
    #[tokio::test]
    #[ignore]
    async fn test_complete_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let client = LlmClient::new(&config);

        let result = client
            .complete(&[ChatMessage::user("Reply with the single word: pong")], 16, 0.0)
            .await;

        match result {
            Ok(response) => {
                println!("LLM 响应: {}", response);
                assert!(!response.is_empty());
            }
            Err(e) => panic!("测试失败: {}", e),
        }
    }
}
