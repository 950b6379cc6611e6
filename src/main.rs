//! Filmow scraper command line tool
//!
//! Extracts the watched, favorite and to-watch lists of a Filmow profile and
//! exports them as JSON, Excel and CSV.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filmow_scraper::cli::{CliArgs, SortPlan};
use filmow_scraper::collector::{CollectProgress, Collector};
use filmow_scraper::config::Config;
use filmow_scraper::constants::messages;
use filmow_scraper::error::{AppError, AppResult};
use filmow_scraper::export;
use filmow_scraper::models::Language;
use filmow_scraper::sorter::sort_library_by_keys;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse_args();

    if let Err(msg) = cli.validate() {
        eprintln!("{}", msg);
        return ExitCode::from(2);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_directive()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: CliArgs) -> AppResult<()> {
    let mut config = Config::from_env();
    cli.apply_to(&mut config).map_err(AppError::validation)?;

    let language = config.language;
    let formats = cli.export_formats().map_err(AppError::validation)?;
    let plan = cli.sort_plan()?;
    let selection = cli.selection();

    let username = match config.username.clone() {
        Some(username) => username,
        None => prompt_username(language)?,
    };

    println!("{}", messages::welcome(language, &username));
    println!("{}", messages::wait(language));
    info!("Starting extraction for {} from {}", username, config.base_url);

    let collector = Collector::from_config(&config, &username)?.with_progress(true);
    let library = collector
        .collect_all(selection, |progress| match progress {
            CollectProgress::Started(media_type) => {
                println!("{}", messages::extracting(language, media_type));
            }
            CollectProgress::Finished(media_type, collection) => {
                println!(
                    "{}",
                    messages::found(
                        language,
                        media_type,
                        collection.watched.len(),
                        collection.favorites.len(),
                        collection.to_watch.len(),
                    )
                );
            }
        })
        .await;

    println!("{}", messages::sorting(language));
    let library = match plan {
        SortPlan::Preset(preset) => preset.apply_library(&library),
        SortPlan::Keys(keys) => sort_library_by_keys(&library, &keys),
    };

    println!("{}", messages::exporting(language));
    let base = export::base_filename(&username, chrono::Local::now());
    let sheets = export::sheets(&library, selection, language);

    if formats.json {
        let path = export::json_path(&config.output_dir, &base);
        export::export_json(&path, &sheets, language)?;
        println!("{}", messages::json_success(language, &path.display().to_string()));
    }

    if formats.xlsx {
        let path = export::xlsx_path(&config.output_dir, &base);
        export::export_xlsx(&path, &sheets, language)?;
        println!("{}", messages::xlsx_success(language, &path.display().to_string()));
    }

    if formats.csv {
        let dir = export::csv_dir(&config.output_dir, &base);
        export::export_csv(&dir, &sheets, language)?;
        println!("{}", messages::csv_success(language, &dir.display().to_string()));
    }

    info!(
        "Finished after {} requests",
        collector.scraper().request_count()
    );
    println!("{}", messages::completion(language));
    Ok(())
}

/// Ask for the username on stdin
fn prompt_username(language: Language) -> AppResult<String> {
    print!("{}", messages::username_prompt(language));
    io::stdout()
        .flush()
        .map_err(|e| AppError::internal(e.to_string()))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| AppError::internal(e.to_string()))?;

    let username = line.trim();
    if username.is_empty() {
        return Err(AppError::validation("A Filmow username is required"));
    }
    Ok(username.to_string())
}
