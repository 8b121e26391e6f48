//! # Farmstand Register Library
//!
//! Core library for the farm shop's terminal register.
//! This is the main entry point that wires logging, storage and the
//! interactive session together.
//!
//! ## Module Organization
//! ```text
//! farmstand_register/
//! ├── lib.rs          ◄─── You are here (startup & session loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState (db + cart + config)
//! │   └── config.rs   ◄─── Environment-driven settings
//! ├── commands/
//! │   ├── mod.rs      ◄─── Dispatch
//! │   ├── parse.rs    ◄─── Input line parsing
//! │   ├── product.rs  ◄─── Catalog and barcode commands
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   └── sale.rs     ◄─── Checkout and history
//! ├── render.rs       ◄─── Text views
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Output Streams
//! Command output goes to stdout. Logs go to stderr so they can be
//! silenced or redirected without touching receipts.

pub mod commands;
pub mod error;
pub mod render;
pub mod state;

use directories::ProjectDirs;
use std::error::Error;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::{execute, parse::parse_command, Reply};
use farmstand_db::{Database, DbConfig};
use state::{AppState, ConfigState};

const PROMPT: &str = "> ";

/// Runs the register until the operator quits or stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • FARMSTAND_STORE_NAME, FARMSTAND_CURRENCY_SYMBOL                   │
/// │     • FARMSTAND_DB_PATH (optional)                                      │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Session Loop ─────────────────────────────────────────────────────► │
/// │     • Read line, parse, execute, print                                  │
/// │     • Errors are printed; the session continues                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn Error>> {
    init_tracing();

    info!("Starting Farmstand register");

    let config = ConfigState::from_env();
    let db_path = database_path(&config)?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    if !db.health_check().await {
        warn!("Database did not answer a health check");
    }
    info!("Database connected and migrations applied");

    let mut state = AppState::new(db, config);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    run_session(&mut state, stdin, stdout).await?;

    state.db.close().await;
    info!("Register closed");
    Ok(())
}

/// Reads commands line by line and writes their output.
///
/// ## Behavior
/// - Blank lines are ignored
/// - Failed commands print `error: ...` and the session continues
/// - `quit` or end of input ends the session
pub async fn run_session<R, W>(
    state: &mut AppState,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    writer
        .write_all(format!("{}\n", render::banner(&state.config)).as_bytes())
        .await?;

    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let result = match parse_command(&line) {
            Ok(Some(command)) => execute(state, command).await,
            Ok(None) => continue,
            Err(e) => Err(e),
        };

        let text = match result {
            Ok(Reply::Quit) => break,
            Ok(Reply::Output(text)) => text,
            Err(e) => {
                warn!(error = %e, "Command failed");
                format!("error: {}", e.message)
            }
        };

        writer.write_all(format!("{}\n", text).as_bytes()).await?;
    }

    writer.flush().await
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=farmstand=trace` - Show trace for farmstand crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,farmstand=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.farmstand.pos/farmstand.db`
/// - **Windows**: `%APPDATA%\farmstand\pos\data\farmstand.db`
/// - **Linux**: `~/.local/share/pos/farmstand.db`
///
/// ## Override
/// `FARMSTAND_DB_PATH` (already folded into `config.db_path`).
fn database_path(config: &ConfigState) -> Result<PathBuf, Box<dyn Error>> {
    if let Some(path) = &config.db_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "farmstand", "pos")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("farmstand.db"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn session(input: &str) -> (AppState, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut state = AppState::new(db, ConfigState::default());
        let mut output = Vec::new();

        run_session(&mut state, input.as_bytes(), &mut output)
            .await
            .unwrap();

        (state, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_session_banner_and_quit() {
        let (_, output) = session("quit\nproducts\n").await;

        assert!(output.starts_with("Farmstand register."));
        // Nothing after quit is executed
        assert!(!output.contains("No products"));
    }

    #[tokio::test]
    async fn test_session_continues_after_errors() {
        let (state, output) = session("dance\n\nnew Apples 2.50 10\ncheckout\nproducts\n").await;

        assert!(output.contains("error: Unknown command 'dance'"));
        assert!(output.contains("error: Cannot complete a sale with an empty cart"));
        assert!(output.contains("Apples"));
        assert_eq!(state.db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_session_find_by_name() {
        let (_, output) =
            session("new \"Raw Honey\" 12 5\nnew Kale 3 9\nfind hONEY\nfind pumpkin\n").await;

        let found = output.split("> ").nth(3).unwrap();
        assert!(found.contains("Raw Honey"));
        assert!(!found.contains("Kale"));

        let missing = output.split("> ").nth(4).unwrap();
        assert!(missing.contains("No products"));
    }

    #[tokio::test]
    async fn test_session_sale_end_to_end() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut state = AppState::new(db, ConfigState::default());

        let mut setup = Vec::new();
        run_session(&mut state, &b"new Eggs 4.50 12\n"[..], &mut setup)
            .await
            .unwrap();
        let eggs = state.db.products().list().await.unwrap().remove(0);

        let input = format!("scan {}\nqty {} 2\ncheckout\n", eggs.barcode.formatted(), eggs.id);
        let mut output = Vec::new();
        run_session(&mut state, input.as_bytes(), &mut output)
            .await
            .unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("$9.00"));
        assert!(output.contains("Sale "));
        assert_eq!(state.db.sales().count().await.unwrap(), 1);

        let eggs = state.db.products().get_by_id(&eggs.id).await.unwrap().unwrap();
        assert_eq!(eggs.stock, 10);
    }

    #[test]
    fn test_database_path_override() {
        let config = ConfigState {
            db_path: Some(PathBuf::from("/tmp/shop.db")),
            ..ConfigState::default()
        };
        assert_eq!(database_path(&config).unwrap(), PathBuf::from("/tmp/shop.db"));
    }
}
