use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ibooku::core::action::Action;
use ibooku::core::config::{self, ResolvedConfig};
use ibooku::core::flow::BookSearchFlow;
use ibooku::core::review::{ReviewItem, ReviewOrder, reorder};
use ibooku::core::state::{SearchState, SearchVariant};
use ibooku::core::store::{KeywordStore, MemoryKeywordStore, PreferenceFile, PreferenceKeywordStore};
use ibooku::service::HttpBookService;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "ibooku", about = "Book search and reviews from the terminal")]
struct Args {
    /// Search API base URL (overrides config and IBOOKU_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search books by keyword and remember the keyword
    Search { keyword: String },
    /// Show related keywords for partial input
    Suggest { text: String },
    /// List recent search keywords
    Recent,
    /// Remove a keyword from the recent list
    Forget { keyword: String },
    /// Show details for one book
    Info { isbn: String },
    /// Print reviews from a JSON file in the chosen order
    Reviews {
        file: PathBuf,
        #[arg(short, long, default_value_t, value_enum)]
        order: ReviewOrder,
    },
}

fn init_logging(config: &ResolvedConfig) {
    let level = LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::Debug);
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn build_store(config: &ResolvedConfig) -> Arc<dyn KeywordStore> {
    if config.persist_keywords {
        Arc::new(PreferenceKeywordStore::new(PreferenceFile::new(
            config.preferences_path.clone(),
        )))
    } else {
        Arc::new(MemoryKeywordStore::new())
    }
}

fn build_flow(config: &ResolvedConfig) -> Result<BookSearchFlow, Box<dyn Error>> {
    let service = HttpBookService::with_timeout(
        config.api_base_url.clone(),
        config.api_key.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;
    Ok(BookSearchFlow::new(
        SearchVariant::BookInfo,
        Arc::new(service),
        build_store(config),
    ))
}

fn print_error(state: &SearchState) {
    if let Some(ref err) = state.error {
        eprintln!("error: {err}");
        if err.is_retryable() {
            eprintln!("the service may be temporarily unavailable; try again shortly");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("warning: {e}; using defaults");
        config::IbookuConfig::default()
    });
    let resolved = config::resolve(&file_config, args.base_url.as_deref());
    init_logging(&resolved);

    log::info!("ibooku starting up against {}", resolved.api_base_url);

    match args.command {
        Command::Search { keyword } => {
            let mut flow = build_flow(&resolved)?;
            flow.dispatch(Action::TextChanged(keyword));
            flow.dispatch(Action::SubmitKeyword);
            let state = flow.settle().await;
            print_error(state);
            if state.is_searched {
                println!(
                    "{} result(s) for {:?}",
                    state.search_result.result_list.len(),
                    state.search_result.searched_keyword
                );
                for item in &state.search_result.result_list {
                    println!(
                        "{}  {} / {} / {}  ★{:.1}",
                        item.isbn, item.title, item.author, item.publisher, item.rating
                    );
                }
            } else if state.error.is_none() {
                println!("No results.");
            }
        }
        Command::Suggest { text } => {
            let mut flow = build_flow(&resolved)?;
            flow.dispatch(Action::TextChanged(text));
            let state = flow.settle().await;
            for keyword in &state.related_keyword_list {
                println!("{keyword}");
            }
        }
        Command::Recent => {
            for keyword in build_store(&resolved).load_or_empty() {
                println!("{keyword}");
            }
        }
        Command::Forget { keyword } => {
            let mut flow = build_flow(&resolved)?;
            let state = flow.dispatch(Action::RemoveRecentKeyword(keyword));
            print_error(state);
            for keyword in &state.recent_keyword_list {
                println!("{keyword}");
            }
        }
        Command::Info { isbn } => {
            let mut flow = build_flow(&resolved)?;
            flow.dispatch(Action::SelectBook(isbn.clone()));
            let state = flow.settle().await;
            print_error(state);
            match state.selected_book {
                Some(ref book) => {
                    println!("{} ({})", book.title, book.isbn);
                    println!("{} / {}  ★{:.1}", book.author, book.publisher, book.rating);
                    if !book.content.is_empty() {
                        println!();
                        println!("{}", book.content);
                    }
                }
                None if state.error.is_none() => println!("Book {isbn} not found."),
                None => {}
            }
        }
        Command::Reviews { file, order } => {
            let json = std::fs::read_to_string(&file)?;
            let reviews: Vec<ReviewItem> = serde_json::from_str(&json)?;
            for review in reorder(&reviews, order) {
                println!(
                    "{}  ★{:.1}  {}  {}",
                    review.datetime.to_rfc3339(),
                    review.rating,
                    review.nickname,
                    review.content
                );
            }
        }
    }

    Ok(())
}
