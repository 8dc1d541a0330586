//! services/api/src/bin/cli.rs
//!
//! Interactive command-line loop: `task` generates today's reading, `exit`
//! quits, anything else prints a usage reminder.

use api_lib::{
    adapters::{DeepSeekClient, FileExporter, LogNotifier, SqliteStore},
    config::Config,
    error::ApiError,
};
use reading_coach_core::{
    clean_markdown, truncate_chars, GenerationOutcome, Notifier, ReadingExporter,
    ReadingGenerator,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_key = config.require_api_key()?.to_string();

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(SqliteStore::new(db_pool));
    store.init_schema().await?;

    let client = Arc::new(
        DeepSeekClient::new(
            config.api_base.clone(),
            api_key,
            config.generation_model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
        .map_err(|e| ApiError::Internal(format!("building HTTP client: {}", e)))?,
    );
    let exporter = FileExporter::new(config.export_dir.clone());
    let notifier = LogNotifier::default();
    let generator = ReadingGenerator::new(store, client, config.generation.clone());

    println!("=== English Learning Assistant ===");
    println!("Type 'task' to generate today's reading | 'exit' to quit");

    let stdin = std::io::stdin();
    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF behaves like exit
        }
        let cmd = line.trim().to_lowercase();

        match cmd.as_str() {
            "exit" => {
                println!("Goodbye");
                break;
            }
            "task" => {
                // Storage failures stay fatal; an exhausted budget is a
                // normal outcome reported in plain language.
                match generator.generate_daily_reading().await? {
                    GenerationOutcome::Generated(content) => {
                        let cleaned = clean_markdown(&content);
                        let path = exporter.export(&cleaned).await?;

                        println!("\nToday's English reading is ready (preview):\n");
                        println!(
                            "{}...\n",
                            truncate_chars(&cleaned, config.generation.preview_chars)
                        );
                        notifier
                            .notify(&format!(
                                "Today's English reading is ready!\nSaved to:\n{}",
                                path.display()
                            ))
                            .await;
                    }
                    GenerationOutcome::Exhausted => {
                        println!("Generation failed, please try again later.");
                    }
                }
            }
            _ => println!("Please type 'task' or 'exit'"),
        }
    }

    Ok(())
}
