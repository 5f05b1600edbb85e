//! Cliente HTTP do endpoint de completion.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::Generator;
use super::error::GenerationError;
use super::types::{CompletionRequest, CompletionResponse};

/// Backend de geração acessado via HTTP.
///
/// Respostas 429 viram [`GenerationError::RateLimited`]; outros status de
/// erro viram [`GenerationError::ApiError`].
#[derive(Clone)]
pub struct HttpGenerator {
    // Token Bearer; `None` quando a chave está vazia.
    api_key: Option<String>,
    // Cliente reqwest com timeouts de conexão e de requisição.
    client: Client,
    // URL que recebe o POST.
    endpoint: String,
}

impl HttpGenerator {
    /// Cria o cliente. Uma chave vazia equivale a nenhuma autenticação.
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
            endpoint,
        })
    }

    /// Envia a requisição e retorna o texto da completion, sem espaços nas pontas.
    pub async fn send(&self, req: &CompletionRequest) -> Result<String, GenerationError> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(req);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(GenerationError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<CompletionResponse>().await?;
        let text = body.into_text();
        debug!(chars = text.len(), "completion received");
        Ok(text.trim().to_string())
    }
}

impl Generator for HttpGenerator {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let req = CompletionRequest {
            prompt: prompt.to_string(),
            max_tokens,
            temperature,
        };
        self.send(&req).await
    }
}
