use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::warn;

use blogsmith::cli::{Cli, Command, ProfileAction};
use blogsmith::config::BlogsmithConfig;
use blogsmith::generation::{Generator, HttpGenerator, MockGenerator};
use blogsmith::profile::ProfileStore;
use blogsmith::scraper::{Summarizer, WebScraper};
use blogsmith::ui::{self, JobProgress};
use blogsmith::{JobOrchestrator, logging};

// Tema e público usados pelo subcomando `demo`.
const DEMO_TOPIC: &str = "Benefits of Unit Testing";
const DEMO_AUDIENCE: &str = "Software engineers";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = BlogsmithConfig::load()?;
    if let Some(workers) = cli.workers {
        config.workers = workers.max(1);
    }
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    match cli.command {
        Command::Run {
            topic,
            audience,
            references,
        } => {
            let scraper = WebScraper::new(&config.user_agent, config.request_timeout())?;
            if config.endpoint.is_empty() {
                warn!("no endpoint configured, using the offline mock backend");
                generate(MockGenerator, scraper, &config, &topic, &audience, &references).await
            } else {
                let generator = HttpGenerator::new(
                    config.endpoint.clone(),
                    Some(config.api_key.clone()),
                    config.request_timeout(),
                )?;
                generate(generator, scraper, &config, &topic, &audience, &references).await
            }
        }
        Command::Demo => {
            let scraper = WebScraper::new(&config.user_agent, config.request_timeout())?;
            generate(MockGenerator, scraper, &config, DEMO_TOPIC, DEMO_AUDIENCE, &[]).await
        }
        Command::Profile { action } => {
            let mut store = ProfileStore::open(&config.profile_path);
            match action {
                ProfileAction::Set { user_id, profile } => {
                    let value: serde_json::Value =
                        serde_json::from_str(&profile).context("profile must be valid JSON")?;
                    store.set(&user_id, value);
                    println!("Saved profile for {user_id}");
                }
                ProfileAction::Get { user_id } => match store.get(&user_id) {
                    Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
                    None => bail!("No profile stored for {user_id}"),
                },
            }
            Ok(())
        }
    }
}

/// Executa um job mostrando o estágio no spinner e imprime o artigo.
async fn generate<G: Generator + Clone, S: Summarizer>(
    generator: G,
    summarizer: S,
    config: &BlogsmithConfig,
    topic: &str,
    audience: &str,
    references: &[String],
) -> Result<()> {
    let orchestrator = JobOrchestrator::new(generator, summarizer, config.workers);
    let progress = JobProgress::start(topic);

    let run = orchestrator.start_job(topic, audience, references);
    tokio::pin!(run);
    let result = loop {
        tokio::select! {
            result = &mut run => break result,
            _ = tokio::time::sleep(Duration::from_millis(100)) => {
                if let Some(job) = orchestrator
                    .list_jobs()
                    .first()
                    .and_then(|id| orchestrator.get_job(id).ok())
                {
                    progress.update_stage(job.stage);
                }
            }
        }
    };

    match result {
        Ok(job) => {
            progress.succeeded(&job);
            ui::print_article(&job);
            Ok(())
        }
        Err(e) => {
            progress.failed(&e.to_string());
            Err(e.into())
        }
    }
}
