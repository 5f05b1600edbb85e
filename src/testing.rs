//! Colaboradores roteirizados compartilhados pelos testes unitários.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::generation::{GenerationError, Generator};
use crate::scraper::Summarizer;

#[derive(Clone)]
enum Reply {
    Text(String),
    Fail,
}

#[derive(Clone)]
struct Rule {
    needles: Vec<String>,
    reply: Reply,
}

// Contadores compartilhados entre os clones de um mesmo gerador.
#[derive(Default)]
struct Calls {
    prompts: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Gerador cujas respostas são escolhidas por trechos do prompt.
///
/// Vence a primeira regra cujos trechos aparecem todos no prompt; sem regra
/// o prompt volta como `echo: <prompt>`. Clones compartilham o registro de
/// chamadas.
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    rules: Vec<Rule>,
    delays: Vec<(String, Duration)>,
    calls: Arc<Calls>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, needles: &[&str], text: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            reply: Reply::Text(text.into()),
        });
        self
    }

    pub fn fail(mut self, needles: &[&str]) -> Self {
        self.rules.push(Rule {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            reply: Reply::Fail,
        });
        self
    }

    /// Atrasa as respostas a prompts que contêm `needle`.
    pub fn delay(mut self, needle: &str, millis: u64) -> Self {
        self.delays
            .push((needle.to_string(), Duration::from_millis(millis)));
        self
    }

    pub fn calls_matching(&self, needle: &str) -> usize {
        self.calls
            .prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains(needle))
            .count()
    }

    pub fn max_concurrency(&self) -> usize {
        self.calls.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Generator for ScriptedGenerator {
    async fn complete(
        &self,
        prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, GenerationError> {
        let calls = &self.calls;
        let now = calls.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        calls.max_in_flight.fetch_max(now, Ordering::SeqCst);
        calls.prompts.lock().unwrap().push(prompt.to_string());

        let delay = self
            .delays
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }
        calls.in_flight.fetch_sub(1, Ordering::SeqCst);

        let rule = self
            .rules
            .iter()
            .find(|rule| rule.needles.iter().all(|n| prompt.contains(n.as_str())));
        match rule.map(|r| &r.reply) {
            Some(Reply::Text(text)) => Ok(text.clone()),
            Some(Reply::Fail) => Err(GenerationError::Unavailable("scripted failure".into())),
            None => Ok(format!("echo: {prompt}")),
        }
    }
}

/// Resumidor que responde a partir de uma tabela fixa; URLs desconhecidas
/// não rendem nada.
pub struct TableSummarizer(pub Vec<(&'static str, &'static str)>);

impl Summarizer for TableSummarizer {
    async fn summarize(&self, url: &str) -> String {
        self.0
            .iter()
            .find(|(u, _)| *u == url)
            .map(|(_, s)| s.to_string())
            .unwrap_or_default()
    }
}
