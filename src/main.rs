mod db;
mod fetcher;
mod parser;
mod semantic;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jobpost_scraper", about = "Job posting scraper and structured extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one job posting URL and print the extracted record as JSON
    Scrape {
        url: String,
        /// Also store the page and its record in the local database
        #[arg(long)]
        save: bool,
        /// Upgrade extracted fields with the semantic extractor when available
        #[arg(long)]
        semantic: bool,
    },
    /// Extract a record from a saved HTML file and print it as JSON
    File {
        path: PathBuf,
        #[arg(long)]
        semantic: bool,
    },
    /// Queue a list of URLs (one per line), fetch them all, then extract
    Run {
        file: PathBuf,
        /// Max pages to fetch (default: all unvisited)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Extract records for fetched pages that have none yet
    Process {
        /// Max pages to process (default: all unprocessed)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show queue and extraction statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape { url, save, semantic } => {
            let client = fetcher::build_client()?;
            let html = fetcher::fetch_page(&client, &url).await?;
            let record = extract_record(&html, semantic).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);

            if save {
                let conn = db::connect()?;
                db::init_schema(&conn)?;
                let page_id = db::insert_page(&conn, &url)?;
                let page_data_id = db::save_fetch(
                    &conn,
                    &db::FetchRow {
                        page_id,
                        url: url.clone(),
                        html: Some(html),
                        error: None,
                        latency_ms: None,
                        fetched_at: chrono::Utc::now().to_rfc3339(),
                    },
                )?;
                db::save_records(&conn, &[(page_data_id, url, record)])?;
                println!("Saved to database.");
            }
            Ok(())
        }
        Commands::File { path, semantic } => {
            let html = std::fs::read_to_string(&path)?;
            let record = extract_record(&html, semantic).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Commands::Run { file, limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;

            let urls: Vec<String> = std::fs::read_to_string(&file)?
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(String::from)
                .collect();
            let inserted = db::insert_pages(&conn, &urls)?;
            println!("Queued {} new URLs ({} listed)", inserted, urls.len());

            let pages = db::fetch_unvisited(&conn, limit)?;
            if pages.is_empty() {
                println!("No unvisited pages.");
                return Ok(());
            }

            // Phase 1: fetch (streaming to DB)
            let t_fetch = Instant::now();
            println!("Fetching {} pages (streaming to DB)...", pages.len());
            let stats = fetcher::fetch_pages_streaming(&conn, pages).await?;
            println!(
                "Fetched {} pages ({} ok, {} errors) in {:.1}s",
                stats.total,
                stats.ok,
                stats.errors,
                t_fetch.elapsed().as_secs_f64()
            );

            // Phase 2: extract
            let unprocessed = db::fetch_unprocessed(&conn, None)?;
            if unprocessed.is_empty() {
                println!("Nothing to process (all fetched pages had errors).");
                return Ok(());
            }
            println!("Processing {} pages...", unprocessed.len());
            let processed = process_pages(&conn, &unprocessed)?;
            println!("Saved {processed} job records.");
            Ok(())
        }
        Commands::Process { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let pages = db::fetch_unprocessed(&conn, limit)?;
            if pages.is_empty() {
                println!("No unprocessed pages. Run 'run' first.");
                return Ok(());
            }
            println!("Processing {} pages...", pages.len());
            let processed = process_pages(&conn, &pages)?;
            println!("Saved {processed} job records.");
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Queued:    {}", s.total);
            println!("Visited:   {}", s.visited);
            println!("Unvisited: {}", s.unvisited);
            println!("Fetched:   {}", s.fetched);
            println!("Errors:    {}", s.errors);
            println!("Processed: {}", s.processed);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Heuristic extraction, with the optional semantic upgrade layered on top.
async fn extract_record(
    html: &str,
    semantic: bool,
) -> anyhow::Result<parser::extract::JobRecord> {
    let mut record = parser::process_document(html);
    if semantic {
        let text = parser::normalized_text(html);
        let extractor = semantic::SemanticExtractor::from_env()?;
        semantic::apply_semantic(&mut record, &text, &extractor).await;
    }
    Ok(record)
}

/// Extract records in parallel, chunked so each chunk lands in the database
/// before the next begins.
fn process_pages(conn: &rusqlite::Connection, pages: &[db::FetchedPage]) -> anyhow::Result<usize> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut processed = 0;
    for chunk in pages.chunks(500) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|p| (p.page_data_id, p.url.clone(), parser::process_document(&p.html)))
            .collect();
        db::save_records(conn, &results)?;
        processed += results.len();
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(processed)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
