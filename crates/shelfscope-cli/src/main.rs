use std::time::Instant;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfscope_core::storage::{json_cards, sessions as session_log};
use shelfscope_core::{
    AppConfig, Book, FilterCriteria, FilterKey, FilterMode, ReadingSession, SortDirection, stats,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "shelfscope",
    about = "Terminal book library browser — filter, sort, and profile your shelves",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting SHELFSCOPE_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List books, with optional filtering and sorting.
    List {
        /// Filter criterion as key=value[,value...]; repeatable.
        /// Keys match the sidebar: author, tag, readStatus, personalRating, ...
        #[arg(long, action = clap::ArgAction::Append)]
        filter: Vec<String>,

        /// Combination mode across and within criteria: "and" or "or".
        #[arg(long)]
        mode: Option<String>,

        /// Sort field (title, titleSeries, author, addedOn, fileSizeKb, ...).
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending instead of ascending.
        #[arg(long)]
        desc: bool,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Add a book to the library.
    Add {
        title: String,
        #[arg(long, action = clap::ArgAction::Append)]
        author: Vec<String>,
        #[arg(long, action = clap::ArgAction::Append)]
        tag: Vec<String>,
        #[arg(long)]
        publisher: Option<String>,
        #[arg(long)]
        series: Option<String>,
        #[arg(long)]
        series_number: Option<f32>,
        #[arg(long)]
        pages: Option<u32>,
        #[arg(long)]
        language: Option<String>,
    },

    /// Operations on a single book.
    Book {
        #[command(subcommand)]
        action: BookAction,
    },

    /// Reading sessions: record and review.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Library statistics.
    Stats {
        #[command(subcommand)]
        view: StatsView,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information.
    Version,
}

// ─── Book Actions ───────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum BookAction {
    /// Get a book card by ID.
    Get { id: String },

    /// Update a book card.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, action = clap::ArgAction::Append)]
        author: Vec<String>,
        #[arg(long)]
        status: Option<String>,
        /// Personal rating on the 0–10 scale; 0 clears it.
        #[arg(long)]
        rating: Option<f64>,
    },
}

// ─── Session Actions ────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum SessionAction {
    /// Record a session that just finished.
    Record {
        /// Book ID the session belongs to.
        book: String,
        /// Session length in minutes, ending now.
        #[arg(long)]
        minutes: i64,
    },

    /// Per-day session counts for a year.
    Heatmap { year: i32 },

    /// Per-book session summary for one ISO week.
    Timeline { year: i32, week: u32 },
}

// ─── Stats Views ────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum StatsView {
    /// Headline library counts.
    Summary,
    /// Read-status distribution.
    Status,
    /// Reading-progress bands.
    Progress,
    /// Personal-rating histogram.
    Rating,
    /// Reader-archetype profile.
    Velocity,
    /// Eight-axis habits profile.
    Habits,
}

// ─── Config Actions ──────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum ConfigAction {
    /// Show all config values.
    List,
    /// Get a specific config key.
    Get { key: String },
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // ── Env var overrides ──────────────────────────────────────────────────
    let json_output = cli.json || std::env::var("SHELFSCOPE_JSON").as_deref() == Ok("1");

    let mut config = AppConfig::load()?;
    if let Ok(lib_path) = std::env::var("SHELFSCOPE_LIBRARY_PATH") {
        config.set_library_path(lib_path.into());
    }

    match cli.command {
        // ── List ───────────────────────────────────────────────────────────
        Commands::List {
            filter,
            mode,
            sort,
            desc,
            limit,
        } => {
            let books = json_cards::list_cards(&config.cards_dir())?;

            let criteria = parse_criteria(&filter)?;
            let mode = parse_mode(mode.as_deref().unwrap_or(&config.ui.default_filter_mode))?;
            let filtered =
                shelfscope_core::filter_books(&books, &criteria, mode, &config.filters);

            let direction = if desc {
                SortDirection::Descending
            } else if sort.is_none() {
                config
                    .ui
                    .default_sort_direction
                    .parse()
                    .unwrap_or(SortDirection::Ascending)
            } else {
                SortDirection::Ascending
            };
            let field = sort.as_deref().unwrap_or(&config.ui.default_sort);
            let sorted = shelfscope_core::sort_books_by_field_name(&filtered, field, direction);

            let shown: Vec<&Book> = sorted.iter().take(limit.unwrap_or(usize::MAX)).collect();
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": shown, "total": sorted.len(), "matched": filtered.len() },
                    "meta": { "duration_ms": dur }
                }))?;
            } else if shown.is_empty() {
                println!("No books matched. Use `shelfscope add` to add books.");
            } else {
                for book in &shown {
                    let authors = book.metadata.authors.join(", ");
                    println!(
                        "{id}  {title:<40}  {authors:<25}  {status}",
                        id = &book.id.to_string()[..8],
                        title = book.metadata.title,
                        status = book.read_status,
                    );
                }
            }
        }

        // ── Add ────────────────────────────────────────────────────────────
        Commands::Add {
            title,
            author,
            tag,
            publisher,
            series,
            series_number,
            pages,
            language,
        } => {
            let mut book = Book::new(title);
            book.metadata.authors = author;
            book.metadata.tags = tag;
            book.metadata.publisher = publisher;
            book.metadata.series_name = series;
            book.metadata.series_number = series_number;
            book.metadata.page_count = pages;
            book.metadata.language = language;
            book.added_on = Some(Utc::now());

            let path = json_cards::save_card(&config.cards_dir(), &book)?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": book,
                    "meta": { "duration_ms": dur, "path": path }
                }))?;
            } else {
                println!("Added: {} ({})", book.metadata.title, &book.id.to_string()[..8]);
            }
        }

        // ── Book ───────────────────────────────────────────────────────────
        Commands::Book { action } => match action {
            BookAction::Get { id } => {
                let book = load_book(&config, &id)?;
                let dur = start.elapsed().as_millis();
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":book,"meta":{"duration_ms":dur}}))?;
                } else {
                    println!("{}", serde_json::to_string_pretty(&book)?);
                }
            }

            BookAction::Update {
                id,
                title,
                author,
                status,
                rating,
            } => {
                let mut book = load_book(&config, &id)?;

                if let Some(t) = title {
                    book.metadata.title = t;
                }
                if !author.is_empty() {
                    book.metadata.authors = author;
                }
                if let Some(s) = status {
                    match s.parse() {
                        Ok(status) => book.read_status = status,
                        Err(_) => {
                            eprintln!("Invalid read status: {s}");
                            std::process::exit(3);
                        }
                    }
                }
                if let Some(r) = rating {
                    book.metadata.personal_rating = if r == 0.0 { None } else { Some(r) };
                }

                book.touch();
                json_cards::save_card(&config.cards_dir(), &book)?;
                let dur = start.elapsed().as_millis();

                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":book,"meta":{"duration_ms":dur}}))?;
                } else {
                    println!("Updated: {}", book.metadata.title);
                }
            }
        },

        // ── Session ────────────────────────────────────────────────────────
        Commands::Session { action } => match action {
            SessionAction::Record { book, minutes } => {
                let book = load_book(&config, &book)?;
                let end = Utc::now();
                let start_time = end - Duration::minutes(minutes);

                let mut session =
                    ReadingSession::new(book.id, book.metadata.title.clone(), start_time, end);
                session.book_type = book.book_type;
                session_log::append_session(&config.sessions_path(), session)?;
                let dur = start.elapsed().as_millis();

                if json_output {
                    print_json(&serde_json::json!({
                        "status": "ok",
                        "data": { "book": book.metadata.title, "minutes": minutes },
                        "meta": { "duration_ms": dur }
                    }))?;
                } else {
                    println!("Recorded {minutes} min in '{}'.", book.metadata.title);
                }
            }

            SessionAction::Heatmap { year } => {
                let sessions = session_log::load_sessions(&config.sessions_path())?;
                let heatmap = stats::sessions::heatmap_for_year(&sessions, year);
                let dur = start.elapsed().as_millis();

                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":heatmap,"meta":{"duration_ms":dur}}))?;
                } else if heatmap.is_empty() {
                    println!("No sessions recorded in {year}.");
                } else {
                    for entry in &heatmap {
                        println!("{}  {}", entry.date, "▪".repeat(entry.count.min(40)));
                    }
                }
            }

            SessionAction::Timeline { year, week } => {
                let sessions = session_log::load_sessions(&config.sessions_path())?;
                let timeline = stats::sessions::timeline_for_week(&sessions, year, week);
                let dur = start.elapsed().as_millis();

                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":timeline,"meta":{"duration_ms":dur}}))?;
                } else if timeline.is_empty() {
                    println!("No sessions in week {week} of {year}.");
                } else {
                    for entry in &timeline {
                        println!(
                            "{title:<40}  {sessions} sessions  {minutes} min",
                            title = entry.book_title,
                            sessions = entry.total_sessions,
                            minutes = entry.total_duration_seconds / 60,
                        );
                    }
                }
            }
        },

        // ── Stats ──────────────────────────────────────────────────────────
        Commands::Stats { view } => {
            let books = json_cards::list_cards(&config.cards_dir())?;
            let dur = start.elapsed().as_millis();

            match view {
                StatsView::Summary => {
                    let sessions = session_log::load_sessions(&config.sessions_path())?;
                    let shelved = books.iter().filter(|b| b.is_shelved()).count();
                    let read = books
                        .iter()
                        .filter(|b| b.read_status == shelfscope_core::ReadStatus::Read)
                        .count();

                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "ok",
                            "data": {
                                "total_books": books.len(),
                                "read": read,
                                "shelved": shelved,
                                "total_sessions": sessions.len(),
                            },
                            "meta": { "duration_ms": dur }
                        }))?;
                    } else {
                        println!("Library statistics:");
                        println!("  Total books:    {}", books.len());
                        println!("  Read:           {read}");
                        println!("  Shelved:        {shelved}");
                        println!("  Total sessions: {}", sessions.len());
                    }
                }
                StatsView::Status => {
                    let dist = stats::read_status_distribution(&books);
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":dist,"meta":{"duration_ms":dur}}))?;
                    } else {
                        for entry in &dist {
                            println!(
                                "{label:<20} {count:>5}  ({pct}%)",
                                label = entry.label,
                                count = entry.count,
                                pct = entry.percentage,
                            );
                        }
                    }
                }
                StatsView::Progress => {
                    let dist = stats::reading_progress_distribution(&books);
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":dist,"meta":{"duration_ms":dur}}))?;
                    } else {
                        for entry in &dist {
                            println!(
                                "{band:<8} {count:>5}  {desc}",
                                band = entry.band,
                                count = entry.count,
                                desc = entry.description,
                            );
                        }
                    }
                }
                StatsView::Rating => {
                    let dist = stats::personal_rating_distribution(&books);
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":dist,"meta":{"duration_ms":dur}}))?;
                    } else {
                        for entry in &dist {
                            println!(
                                "{bucket:>2}  {bar}",
                                bucket = entry.bucket,
                                bar = "▪".repeat(entry.count.min(40)),
                            );
                        }
                    }
                }
                StatsView::Velocity => {
                    let profile = stats::velocity::reading_velocity(&books);
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":profile,"meta":{"duration_ms":dur}}))?;
                    } else if profile.is_empty() {
                        println!("No books in library.");
                    } else {
                        for entry in &profile {
                            println!(
                                "{label:<22} {count:>4} books | avg {pages} pages | avg rating {rating} | {desc}",
                                label = entry.label,
                                count = entry.count,
                                pages = entry.average_pages,
                                rating = entry.average_rating,
                                desc = entry.description,
                            );
                        }
                    }
                }
                StatsView::Habits => {
                    let profile = stats::habits::habits_profile(&books);
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":profile,"meta":{"duration_ms":dur}}))?;
                    } else {
                        println!("Consistency    {:>5.1}", profile.consistency);
                        println!("Multitasking   {:>5.1}", profile.multitasking);
                        println!("Completionism  {:>5.1}", profile.completionism);
                        println!("Exploration    {:>5.1}", profile.exploration);
                        println!("Organization   {:>5.1}", profile.organization);
                        println!("Intensity      {:>5.1}", profile.intensity);
                        println!("Methodology    {:>5.1}", profile.methodology);
                        println!("Momentum       {:>5.1}", profile.momentum);
                    }
                }
            }
        }

        // ── Config ─────────────────────────────────────────────────────────
        Commands::Config { action } => {
            let dur = start.elapsed().as_millis();
            match action {
                ConfigAction::List => {
                    let kv = config_key_values(&config);
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":kv,"meta":{"duration_ms":dur}}))?;
                    } else {
                        for (k, v) in &kv {
                            println!("{k} = {v}");
                        }
                    }
                }
                ConfigAction::Get { key } => {
                    let kv = config_key_values(&config);
                    match kv.iter().find(|(k, _)| *k == key).map(|(_, v)| v) {
                        Some(val) => {
                            if json_output {
                                print_json(&serde_json::json!({"status":"ok","data":{"key":key,"value":val},"meta":{"duration_ms":dur}}))?;
                            } else {
                                println!("{val}");
                            }
                        }
                        None => {
                            eprintln!("Unknown config key: {key}");
                            std::process::exit(2);
                        }
                    }
                }
            }
        }

        // ── Version ────────────────────────────────────────────────────────
        Commands::Version => {
            let version = env!("CARGO_PKG_VERSION");
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"version":version},"meta":{"duration_ms":dur}}))?;
            } else {
                println!("shelfscope v{version}");
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

/// Parse repeated `--filter key=value[,value...]` arguments into a criteria
/// set. Repeating a key merges its values.
fn parse_criteria(args: &[String]) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::new();
    let mut merged: std::collections::BTreeMap<String, Vec<String>> =
        std::collections::BTreeMap::new();

    for arg in args {
        let Some((key, values)) = arg.split_once('=') else {
            eprintln!("Invalid --filter argument (expected key=value): {arg}");
            std::process::exit(3);
        };
        merged
            .entry(key.to_string())
            .or_default()
            .extend(values.split(',').map(str::to_string));
    }

    for (key, values) in merged {
        // FilterKey parsing is total; unknown names become the non-matching
        // Unknown arm.
        let key = key.parse().unwrap_or(FilterKey::Unknown);
        criteria.set(key, values);
    }
    Ok(criteria)
}

fn parse_mode(mode: &str) -> Result<FilterMode> {
    match mode.parse() {
        Ok(mode) => Ok(mode),
        Err(_) => {
            eprintln!("Invalid filter mode (expected and|or): {mode}");
            std::process::exit(3);
        }
    }
}

fn load_book(config: &AppConfig, id: &str) -> Result<Book> {
    let uuid = match uuid::Uuid::parse_str(id) {
        Ok(u) => u,
        Err(_) => {
            eprintln!("Invalid UUID: {id}");
            std::process::exit(3);
        }
    };
    match json_cards::load_card_by_id(&config.cards_dir(), &uuid) {
        Ok(book) => Ok(book),
        Err(_) => {
            eprintln!("Book not found: {id}");
            std::process::exit(2);
        }
    }
}

fn config_key_values(config: &AppConfig) -> Vec<(&'static str, String)> {
    vec![
        ("library_path", config.core.library_path.clone()),
        ("cards_dir", config.cards_dir().to_string_lossy().to_string()),
        (
            "sessions_path",
            config.sessions_path().to_string_lossy().to_string(),
        ),
        ("default_sort", config.ui.default_sort.clone()),
        (
            "default_sort_direction",
            config.ui.default_sort_direction.clone(),
        ),
        ("default_filter_mode", config.ui.default_filter_mode.clone()),
    ]
}
