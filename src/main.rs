use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use newsdedup::config::Config;
use newsdedup::dedup::{
    dedup_stories, filter_against_history, DecisionRecord, FilterMode, FilterOutcome, Removal,
    TARGET_DEDUP,
};
use newsdedup::history::{
    format_digest, load_history, HistoryStore, HistoryWindow, JsonHistoryStore,
};
use newsdedup::logging;
use newsdedup::rss::RssTool;
use newsdedup::story::{Story, StoryFile};
use prettytable::{Cell, Row, Table};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[clap(name = "newsdedup", about = "Keep repeated stories out of the daily newsletter")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether two story texts report the same event
    Check {
        first: String,
        second: String,

        /// Skip the embedding fallback
        #[clap(long)]
        no_embeddings: bool,

        /// Print the decision record as JSON
        #[clap(long)]
        json: bool,
    },

    /// Drop near-copies within one batch of candidate stories
    Dedup {
        /// Newsletter JSON or array of stories
        #[clap(short, long)]
        input: PathBuf,

        /// Where to write the surviving stories (stdout if omitted)
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Jaccard similarity above which a later story is dropped
        #[clap(short, long)]
        threshold: Option<f64>,
    },

    /// Remove candidates already covered in recent newsletters
    Filter {
        #[clap(short, long)]
        input: PathBuf,

        #[clap(short, long)]
        output: Option<PathBuf>,

        /// JSON archive of published newsletters (overrides HISTORY_ARCHIVE)
        #[clap(long)]
        history: Option<PathBuf>,

        /// Days of history to compare against
        #[clap(short, long)]
        days: Option<u64>,

        /// Treat this date as today (YYYY-MM-DD)
        #[clap(long)]
        today: Option<NaiveDate>,

        /// Word similarity only, with this threshold
        #[clap(long)]
        plain: Option<f64>,

        #[clap(long)]
        no_embeddings: bool,

        /// Keep every candidate if all of them would be removed
        #[clap(long)]
        keep_all_on_empty: bool,

        /// Print the removal audit as JSON instead of a table
        #[clap(long)]
        json: bool,
    },

    /// List recently covered titles grouped by date
    Digest {
        #[clap(long)]
        history: Option<PathBuf>,

        #[clap(short, long)]
        days: Option<u64>,

        #[clap(long)]
        today: Option<NaiveDate>,
    },

    /// Read the newest entries of one or more RSS feeds
    Rss {
        #[clap(required = true, num_args = 1..)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging();

    let args = Cli::parse();
    let mut config = Config::from_env();

    match args.command {
        Commands::Check {
            first,
            second,
            no_embeddings,
            json,
        } => {
            if no_embeddings {
                config.detector.use_embeddings = false;
            }
            check(&config, &first, &second, json).await?;
        }
        Commands::Dedup {
            input,
            output,
            threshold,
        } => {
            let threshold = threshold.unwrap_or(config.batch_threshold);
            let file = StoryFile::load(&input)?;
            let total = file.stories.len();
            let unique = dedup_stories(file.stories.clone(), threshold);
            info!(target: TARGET_DEDUP, "Kept {} of {} stories", unique.len(), total);
            write_stories(output, &file, &unique)?;
        }
        Commands::Filter {
            input,
            output,
            history,
            days,
            today,
            plain,
            no_embeddings,
            keep_all_on_empty,
            json,
        } => {
            if no_embeddings {
                config.detector.use_embeddings = false;
            }
            if let Some(threshold) = plain {
                config.use_hybrid = false;
                config.history_threshold = threshold;
            }
            if let Some(days) = days {
                config.history_days = days;
            }
            if history.is_some() {
                config.history_archive = history;
            }

            let file = StoryFile::load(&input)?;
            let candidates = file.stories.clone();
            let outcome = filter(&config, candidates.clone(), today).await?;
            report_removals(&outcome.removed, json)?;

            let kept = if outcome.all_removed() && keep_all_on_empty {
                warn!(
                    target: TARGET_DEDUP,
                    "All {} candidates matched history, keeping them all",
                    candidates.len()
                );
                candidates
            } else {
                outcome.kept
            };
            write_stories(output, &file, &kept)?;
        }
        Commands::Digest {
            history,
            days,
            today,
        } => {
            if let Some(days) = days {
                config.history_days = days;
            }
            let window = HistoryWindow::last_days(today.unwrap_or_else(today_local), config.history_days);
            let store: Box<dyn HistoryStore> = match history {
                Some(path) => Box::new(JsonHistoryStore::new(path)),
                None => config.history_store()?,
            };
            let stories = load_history(store.as_ref(), window).await?;
            println!("{}", format_digest(&stories));
        }
        Commands::Rss { urls } => {
            let tool = RssTool::new(config.tool_cache_ttl)?;
            for url in urls {
                println!("{}", url.bright_blue());
                println!("{}", tool.read(&url).await);
            }
        }
    }

    Ok(())
}

fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

async fn check(config: &Config, first: &str, second: &str, json: bool) -> Result<()> {
    let detector = config.detector()?;
    let (duplicate, record) = detector.is_duplicate(first, second).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let verdict = if duplicate {
        "DUPLICATE".bright_red().bold()
    } else {
        "DISTINCT".bright_green().bold()
    };
    println!("{}: {}", "Verdict".bright_blue(), verdict);
    print_record(&record);
    Ok(())
}

fn print_record(record: &DecisionRecord) {
    let join = |items: Vec<String>| {
        if items.is_empty() {
            "-".dimmed().to_string()
        } else {
            items.join(", ")
        }
    };

    println!(
        "{}: {} | {}",
        "Companies".bright_blue(),
        join(record.entities1.companies.iter().cloned().collect()),
        join(record.entities2.companies.iter().cloned().collect())
    );
    println!(
        "{}: {} | {}",
        "Events".bright_blue(),
        join(record.entities1.events.iter().map(|e| e.to_string()).collect()),
        join(record.entities2.events.iter().map(|e| e.to_string()).collect())
    );
    println!(
        "{}: {} ({})",
        "Entity overlap".bright_blue(),
        record.confidence,
        record.entity_reason
    );
    println!("{}: {:.3}", "Word similarity".bright_blue(), record.word_similarity);
    match record.embedding_similarity {
        Some(similarity) => println!("{}: {:.3}", "Embedding similarity".bright_blue(), similarity),
        None => println!("{}: {}", "Embedding similarity".bright_blue(), "not computed".dimmed()),
    }
    println!("{}: {}", "Reason".bright_blue(), record.decision_reason);
}

async fn filter(config: &Config, candidates: Vec<Story>, today: Option<NaiveDate>) -> Result<FilterOutcome> {
    let window = HistoryWindow::last_days(today.unwrap_or_else(today_local), config.history_days);
    let store = config.history_store()?;
    let history = load_history(store.as_ref(), window).await?;

    if config.use_hybrid {
        let detector = config.detector()?;
        Ok(filter_against_history(candidates, &history, FilterMode::Hybrid(&detector)).await)
    } else {
        let mode = FilterMode::Plain {
            threshold: config.history_threshold,
        };
        Ok(filter_against_history(candidates, &history, mode).await)
    }
}

fn report_removals(removed: &[Removal], json: bool) -> Result<()> {
    if json {
        eprintln!("{}", serde_json::to_string_pretty(removed)?);
        return Ok(());
    }

    if removed.is_empty() {
        eprintln!("{}", "No stories removed".bright_green());
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Removed"),
        Cell::new("Matches"),
        Cell::new("Published"),
        Cell::new("Reason"),
    ]));

    for removal in removed {
        table.add_row(Row::new(vec![
            Cell::new(&removal.story.title),
            Cell::new(&removal.matched_title),
            Cell::new(
                &removal
                    .matched_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
            Cell::new(&removal.reason),
        ]));
    }

    eprintln!("{}", format!("Removed {} stories", removed.len()).bright_red());
    eprintln!("{}", table);
    Ok(())
}

/// Write the input document back with only its stories replaced
fn write_stories(output: Option<PathBuf>, file: &StoryFile, stories: &[Story]) -> Result<()> {
    match output {
        Some(path) => {
            file.save(&path, stories)?;
            info!(target: TARGET_DEDUP, "Wrote {} stories to {}", stories.len(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&file.with_stories(stories)?)?),
    }
    Ok(())
}
