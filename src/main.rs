use std::io::{BufRead, Write};
use std::sync::Arc;

use llm_service::{LlmServiceRoles, RetryPolicy, default_config};
use qa_session::{QaSession, SessionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, when present.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let answer_cfg = default_config::answer_config_from_env()?;
    let embedding_cfg = default_config::embedding_config_from_env()?;
    let svc = Arc::new(LlmServiceRoles::new(
        answer_cfg,
        embedding_cfg,
        RetryPolicy::default(),
    ));

    let mut session = QaSession::with_service(SessionConfig::from_env(), svc)?;

    // Seed the knowledge base when a file is configured.
    if let Ok(path) = std::env::var("KNOWLEDGE_FILE") {
        let report = session.ingest_file(&path).await?;
        info!("seeded {} chunks from {}", report.chunks_added, path);
    }

    println!("docqa ready. Ask a question (empty line to quit).");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            break;
        }

        let qa = session.query(question).await?;
        println!("{}", qa.answer);
        if !qa.sources.is_empty() {
            let sources: Vec<&str> = qa.sources.iter().map(String::as_str).collect();
            println!("[sources: {}]", sources.join(", "));
        }
    }

    Ok(())
}
