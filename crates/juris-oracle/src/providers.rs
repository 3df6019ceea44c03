//! Oracle provider implementations

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use juris_types::Outcome;

use crate::{Judgment, JudgmentOracle, OracleError};

const SYSTEM_PROMPT: &str = "You are a judge for a decentralized prediction market. \
Your job is to evaluate whether a prediction market question has resolved YES or NO \
based on your knowledge.\n\n\
Respond with ONLY a JSON object (no markdown, no code blocks):\n\
{\"outcome\": \"yes\" or \"no\", \"confidence\": 0-100, \"rationale\": \"brief explanation\"}";

fn user_prompt(question: &str) -> String {
    format!(
        "Has this prediction market question resolved? Answer based on available evidence:\n\n\
         \"{question}\"\n\n\
         If the event hasn't happened yet or you're unsure, make your best judgment based on \
         current information."
    )
}

/// The JSON shape every provider must return.
#[derive(Deserialize)]
struct JudgmentWire {
    outcome: String,
    confidence: u16,
    rationale: String,
}

impl TryFrom<JudgmentWire> for Judgment {
    type Error = OracleError;

    fn try_from(wire: JudgmentWire) -> Result<Self, Self::Error> {
        let outcome = match wire.outcome.to_ascii_lowercase().as_str() {
            "yes" => Outcome::Yes,
            "no" => Outcome::No,
            other => {
                return Err(OracleError::MalformedResponse {
                    message: format!("unmappable outcome {other:?}"),
                })
            }
        };
        if wire.confidence > 100 {
            return Err(OracleError::MalformedResponse {
                message: format!("confidence {} out of range", wire.confidence),
            });
        }
        Ok(Judgment {
            outcome,
            confidence: wire.confidence as u8,
            rationale: wire.rationale,
        })
    }
}

fn parse_judgment(text: &str) -> Result<Judgment, OracleError> {
    let wire: JudgmentWire =
        serde_json::from_str(text.trim()).map_err(|e| OracleError::MalformedResponse {
            message: e.to_string(),
        })?;
    wire.try_into()
}

async fn bounded<F>(timeout: Duration, fut: F) -> Result<Judgment, OracleError>
where
    F: std::future::Future<Output = Result<Judgment, OracleError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| OracleError::Timeout {
            timeout_secs: timeout.as_secs(),
        })?
}

// ============================================================================
// Anthropic Provider
// ============================================================================

/// Configuration for the Anthropic provider
#[derive(Debug, Clone)]
pub struct AnthropicOracleConfig {
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl AnthropicOracleConfig {
    pub fn from_env() -> Option<Self> {
        Some(AnthropicOracleConfig {
            api_key: std::env::var("JURIS_LLM_API_KEY")
                .or_else(|_| std::env::var("ANTHROPIC_API_KEY"))
                .ok()?,
            model: std::env::var("JURIS_LLM_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-5".to_string()),
            timeout: oracle_timeout_from_env(),
        })
    }
}

/// Judgment oracle backed by the Anthropic messages API.
pub struct AnthropicOracle {
    config: AnthropicOracleConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    text: String,
}

impl AnthropicOracle {
    pub fn new(config: AnthropicOracleConfig) -> Self {
        AnthropicOracle {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Option<Self> {
        Some(Self::new(AnthropicOracleConfig::from_env()?))
    }

    async fn call(&self, question: &str) -> Result<Judgment, OracleError> {
        let request = AnthropicRequest {
            model: &self.config.model,
            max_tokens: 256,
            system: SYSTEM_PROMPT,
            messages: vec![AnthropicMessage {
                role: "user",
                content: user_prompt(question),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await
            .map_err(|e| OracleError::Transport {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::RequestFailed {
                message: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: AnthropicResponse =
            response
                .json()
                .await
                .map_err(|e| OracleError::MalformedResponse {
                    message: e.to_string(),
                })?;

        let text = parsed
            .content
            .first()
            .map(|c| c.text.as_str())
            .ok_or_else(|| OracleError::MalformedResponse {
                message: "empty content".to_string(),
            })?;

        parse_judgment(text)
    }
}

#[async_trait]
impl JudgmentOracle for AnthropicOracle {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn evaluate(&self, question: &str) -> Result<Judgment, OracleError> {
        bounded(self.config.timeout, self.call(question)).await
    }
}

// ============================================================================
// OpenAI Provider
// ============================================================================

/// Configuration for the OpenAI provider
#[derive(Debug, Clone)]
pub struct OpenAiOracleConfig {
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl OpenAiOracleConfig {
    pub fn from_env() -> Option<Self> {
        Some(OpenAiOracleConfig {
            api_key: std::env::var("JURIS_LLM_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok()?,
            model: std::env::var("JURIS_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout: oracle_timeout_from_env(),
        })
    }
}

/// Judgment oracle backed by the OpenAI chat completions API.
pub struct OpenAiOracle {
    config: OpenAiOracleConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    content: String,
}

impl OpenAiOracle {
    pub fn new(config: OpenAiOracleConfig) -> Self {
        OpenAiOracle {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Option<Self> {
        Some(Self::new(OpenAiOracleConfig::from_env()?))
    }

    async fn call(&self, question: &str) -> Result<Judgment, OracleError> {
        let request = OpenAiRequest {
            model: &self.config.model,
            messages: vec![
                OpenAiMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                OpenAiMessage {
                    role: "user",
                    content: user_prompt(question),
                },
            ],
            max_tokens: 256,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OracleError::Transport {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::RequestFailed {
                message: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: OpenAiResponse =
            response
                .json()
                .await
                .map_err(|e| OracleError::MalformedResponse {
                    message: e.to_string(),
                })?;

        let text = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| OracleError::MalformedResponse {
                message: "empty choices".to_string(),
            })?;

        parse_judgment(text)
    }
}

#[async_trait]
impl JudgmentOracle for OpenAiOracle {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn evaluate(&self, question: &str) -> Result<Judgment, OracleError> {
        bounded(self.config.timeout, self.call(question)).await
    }
}

// ============================================================================
// Scripted Provider
// ============================================================================

/// Canned-answer oracle for tests and offline dry runs.
///
/// Always returns the same judgment. There is deliberately no automatic
/// fallback from a real provider to this one: a vote is an economic action,
/// and a judgment invented on provider failure would be worse than skipping
/// the market until the next scan.
pub struct ScriptedOracle {
    judgment: Judgment,
}

impl ScriptedOracle {
    pub fn new(judgment: Judgment) -> Self {
        ScriptedOracle { judgment }
    }

    /// Shorthand for an oracle that always answers with `outcome`.
    pub fn answering(outcome: Outcome, confidence: u8) -> Self {
        Self::new(Judgment {
            outcome,
            confidence,
            rationale: "scripted judgment".to_string(),
        })
    }
}

#[async_trait]
impl JudgmentOracle for ScriptedOracle {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn evaluate(&self, _question: &str) -> Result<Judgment, OracleError> {
        Ok(self.judgment.clone())
    }
}

// ============================================================================
// Environment selection
// ============================================================================

fn oracle_timeout_from_env() -> Duration {
    let secs = std::env::var("JURIS_ORACLE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);
    Duration::from_secs(secs)
}

/// Build the oracle named by `JURIS_LLM_PROVIDER` (`claude`/`anthropic`,
/// default, or `openai`).
///
/// Missing credentials are a configuration error, surfaced before any scan
/// begins — never a silent fallback.
pub fn oracle_from_env() -> Result<Box<dyn JudgmentOracle>, OracleError> {
    let _ = dotenvy::dotenv();

    let provider = std::env::var("JURIS_LLM_PROVIDER").unwrap_or_else(|_| "claude".to_string());
    tracing::debug!(provider = %provider, "selecting judgment oracle");
    match provider.to_ascii_lowercase().as_str() {
        "claude" | "anthropic" => AnthropicOracle::from_env()
            .map(|p| Box::new(p) as Box<dyn JudgmentOracle>)
            .ok_or_else(|| OracleError::Configuration {
                message: "anthropic provider selected but no API key found \
                          (set JURIS_LLM_API_KEY or ANTHROPIC_API_KEY)"
                    .to_string(),
            }),
        "openai" => OpenAiOracle::from_env()
            .map(|p| Box::new(p) as Box<dyn JudgmentOracle>)
            .ok_or_else(|| OracleError::Configuration {
                message: "openai provider selected but no API key found \
                          (set JURIS_LLM_API_KEY or OPENAI_API_KEY)"
                    .to_string(),
            }),
        other => Err(OracleError::Configuration {
            message: format!("unknown oracle provider {other:?}"),
        }),
    }
}
