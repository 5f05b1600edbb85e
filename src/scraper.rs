//! Capacidade de pesquisa na web.
//!
//! O [`WebScraper`] baixa uma página via HTTP, mantém o texto dos elementos
//! `<p>` e o resume nas primeiras frases. Qualquer falha rende texto vazio;
//! a pesquisa é best effort.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// `summarize(url) -> texto`, vazio em caso de falha.
pub trait Summarizer: Sync {
    fn summarize(&self, url: &str) -> impl Future<Output = String> + Send;
}

// Limite de caracteres do texto extraído de uma página.
const MAX_CHARS: usize = 3000;
// Frases mantidas no resumo.
const SUMMARY_SENTENCES: usize = 3;

/// Busca referências via HTTP e resume o texto dos parágrafos.
pub struct WebScraper {
    // Cliente com timeout, user agent e limite de redirects.
    client: reqwest::Client,
}

impl WebScraper {
    /// Cria o cliente HTTP usado nas buscas.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Texto dos parágrafos da página em `url`, limitado a 3000 caracteres.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;
        Ok(paragraph_text(&html, MAX_CHARS))
    }
}

impl Summarizer for WebScraper {
    async fn summarize(&self, url: &str) -> String {
        match self.fetch_text(url).await {
            Ok(text) => {
                debug!(url = %url, chars = text.len(), "fetched reference");
                summarize_text(&text)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "failed to fetch reference");
                String::new()
            }
        }
    }
}

/// Texto de todos os `<p>` de `html`, truncado em `max_chars`.
pub fn paragraph_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };
    let joined = document
        .select(&selector)
        .map(|p| {
            p.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    joined.chars().take(max_chars).collect()
}

/// As três primeiras frases de `text`, terminadas com ponto.
pub fn summarize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let head = text
        .split('.')
        .take(SUMMARY_SENTENCES)
        .collect::<Vec<_>>()
        .join(".");
    format!("{}.", head.trim())
}
