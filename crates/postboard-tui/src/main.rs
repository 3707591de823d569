use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use postboard_core::config::BASE_URL_ENV;
use postboard_core::{Config, Post, PostBoard, PostId, PostRepository, PostsClient};
use tracing::{info, warn};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "postboard")]
#[command(about = "Read and write posts on a blog API")]
struct Cli {
    /// API base URL (overrides POSTBOARD_BASE_URL and the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print all posts
    List,
    /// Create a post
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
    },
    /// Replace the title and content of a post
    Update {
        id: PostId,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
    },
    /// Delete a post by id
    Delete {
        id: PostId,
    },
    /// Save defaults to the config file
    Config {
        /// Default API base URL
        #[arg(long = "set-base-url")]
        set_base_url: Option<String>,
        /// Log level (trace, debug, info, warn, error)
        #[arg(long)]
        log_level: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config file falls back to defaults but is never overwritten
    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_else(|_| Config::new());
    let env_url = std::env::var(BASE_URL_ENV).ok();
    let base_url = config.resolve_base_url(cli.base_url.as_deref(), env_url.as_deref());
    let client = PostsClient::new(&base_url);

    match cli.command {
        None => {
            let log_path = Config::config_dir()?.join("postboard.log");
            logging::init_file(&log_path, config.log_level())?;
            warn_unreadable_config(&loaded);
            info!(%base_url, "starting board");
            run_tui(Arc::new(client), &base_url).await
        }
        Some(command) => {
            logging::init_stderr(config.log_level.as_deref().unwrap_or("warn"));
            warn_unreadable_config(&loaded);
            match command {
                Commands::List => list_posts(&client).await,
                Commands::Create { title, content } => create_post(&client, &title, &content).await,
                Commands::Update { id, title, content } => {
                    update_post(&client, id, &title, &content).await
                }
                Commands::Delete { id } => delete_post(&client, id).await,
                Commands::Config { set_base_url, log_level } => {
                    let config = updated_config(loaded, set_base_url, log_level)?;
                    config.save()?;
                    println!("{}", serde_json::to_string_pretty(&config)?);
                    Ok(())
                }
            }
        }
    }
}

async fn run_tui(repo: Arc<dyn PostRepository>, base_url: &str) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let mut app = App::new(repo, base_url, events.sender());
    app.mount();

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}

fn board_result(board: &PostBoard) -> Result<()> {
    match board.error() {
        Some(error) => Err(anyhow!("{}", error)),
        None => Ok(()),
    }
}

fn print_posts(board: &PostBoard) {
    if board.posts().is_empty() {
        println!("{}", postboard_core::board::EMPTY_PLACEHOLDER);
        return;
    }

    for post in board.posts() {
        println!("#{} {}", post.id, post.title);
        for line in post.content.lines() {
            println!("    {}", line);
        }
        println!();
    }
}

async fn list_posts(repo: &dyn PostRepository) -> Result<()> {
    let mut board = PostBoard::new();
    board.load(repo).await;
    board_result(&board)?;

    print_posts(&board);
    Ok(())
}

async fn create_post(repo: &dyn PostRepository, title: &str, content: &str) -> Result<()> {
    let mut board = PostBoard::new();
    board.set_title(title);
    board.set_content(content);

    board
        .submit(repo)
        .await
        .map_err(|missing| anyhow!("Please fill out the {} field.", missing.label()))?;
    board_result(&board)?;

    print_posts(&board);
    Ok(())
}

async fn update_post(repo: &dyn PostRepository, id: PostId, title: &str, content: &str) -> Result<()> {
    let mut board = PostBoard::new();
    board.begin_edit(&Post {
        id,
        title: title.to_string(),
        content: content.to_string(),
    });

    board
        .submit(repo)
        .await
        .map_err(|missing| anyhow!("Please fill out the {} field.", missing.label()))?;
    board_result(&board)?;

    print_posts(&board);
    Ok(())
}

async fn delete_post(repo: &dyn PostRepository, id: PostId) -> Result<()> {
    let mut board = PostBoard::new();
    board.delete(repo, id).await;
    board_result(&board)?;

    print_posts(&board);
    Ok(())
}

fn warn_unreadable_config(loaded: &Result<Config>) {
    if let Err(e) = loaded {
        warn!(error = %e, "ignoring unreadable config file, using defaults");
    }
}

/// Apply `config` command overrides, refusing to build on a file that failed to parse
fn updated_config(
    loaded: Result<Config>,
    base_url: Option<String>,
    log_level: Option<String>,
) -> Result<Config> {
    let mut config = loaded.context("config file is unreadable; fix or remove it before saving")?;
    if base_url.is_some() {
        config.base_url = base_url;
    }
    if log_level.is_some() {
        config.log_level = log_level;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_overrides_apply() {
        let loaded = Ok(Config {
            base_url: Some("http://old".to_string()),
            log_level: Some("debug".to_string()),
        });

        let config = updated_config(loaded, Some("http://new".to_string()), None).unwrap();

        assert_eq!(config.base_url.as_deref(), Some("http://new"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_unreadable_config_is_not_replaced() {
        let loaded = Err(anyhow!("expected value at line 1 column 1"));

        let result = updated_config(loaded, Some("http://new".to_string()), None);

        assert!(result.is_err());
    }
}
