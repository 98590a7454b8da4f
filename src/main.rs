
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, Subcommand};
use time::UtcOffset;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use insightdash::config::{ConfigError, DashboardConfig};
use insightdash::export::{ExportError, default_export_file_name};
use insightdash::net::{ClientError, QueryClient};
use insightdash::render::{render_history, render_results};
use insightdash::{Dashboard, SubmitStatus};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("client setup failed: {0}")]
    Client(#[from] ClientError),
    #[error("query is empty")]
    EmptyQuery,
    #[error("query failed: {0}")]
    Query(String),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "insightdash", about = "Ask an analytics backend questions in plain language")]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "AI_SERVICE_URL")]
    base_url: Option<String>,

    /// Log debug detail to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one query and print the result.
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Write the result set as CSV. A directory gets the default file name.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Print autocomplete suggestions.
    Suggest { query: Option<String> },
    /// Interactive session with history.
    Repl,
}

type CliDashboard = Dashboard<QueryClient>;

fn main() -> Result<(), CliError> {
    // The local offset can only be read while the process is single-threaded,
    // so resolve it before the runtime starts its workers.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(run(offset))
}

async fn run(offset: UtcOffset) -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    let mut config = DashboardConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url);
    }
    let client = QueryClient::new(&config)?;
    tracing::debug!(base_url = client.base_url(), %offset, "client ready");
    let mut dashboard = Dashboard::new(client);

    match cli.command {
        Command::Ask { query, export } => run_ask(&mut dashboard, &query.join(" "), export.as_deref()).await,
        Command::Suggest { query } => run_suggest(&mut dashboard, query).await,
        Command::Repl => run_repl(&mut dashboard, offset).await,
    }
}

// =============================================================================
// ONE-SHOT COMMANDS
// =============================================================================

async fn run_ask(dashboard: &mut CliDashboard, query: &str, export: Option<&Path>) -> Result<(), CliError> {
    dashboard.set_query_text(query);
    let status = dashboard.submit().await;
    print!("{}", render_results(dashboard.store().state()));

    match status {
        SubmitStatus::Completed(_) => {}
        SubmitStatus::Skipped => return Err(CliError::EmptyQuery),
        SubmitStatus::Failed(message) => return Err(CliError::Query(message)),
        SubmitStatus::Aborted(e) => return Err(CliError::Query(e.to_string())),
    }

    if let Some(path) = export {
        let written = write_export(dashboard, path).await?;
        eprintln!("exported {}", written.display());
    }
    Ok(())
}

async fn run_suggest(dashboard: &mut CliDashboard, query: Option<String>) -> Result<(), CliError> {
    match query {
        Some(text) => {
            dashboard.set_query_text(text);
            dashboard.refresh_suggestions().await;
        }
        None => dashboard.load_default_suggestions().await,
    }
    for suggestion in &dashboard.store().state().suggestions {
        println!("{suggestion}");
    }
    Ok(())
}

async fn write_export(dashboard: &CliDashboard, path: &Path) -> Result<PathBuf, CliError> {
    let target = if path.is_dir() { path.join(default_export_file_name()) } else { path.to_path_buf() };
    let csv = dashboard.export_csv()?;
    let mut file = tokio::fs::File::create(&target).await?;
    file.write_all(csv.as_bytes()).await?;
    file.flush().await?;
    Ok(target)
}

// =============================================================================
// REPL
// =============================================================================

const REPL_HELP: &str = "\
:history            list past queries
:use <id>           rerun a past query
:rm <id>            delete a past query
:clear-history      delete all past queries
:suggest [text]     show suggestions
:clear              clear the results panel
:export [path]      write results as CSV
:quit               exit
anything else is sent as a query";

enum ReplAction {
    Continue,
    Quit,
}

async fn run_repl(dashboard: &mut CliDashboard, offset: UtcOffset) -> Result<(), CliError> {
    // Announce each transition into the loading state.
    let seen = Arc::new(AtomicBool::new(false));
    dashboard.store_mut().subscribe(move |state| {
        let pending = state.results.is_pending();
        if pending && !seen.swap(true, Ordering::Relaxed) {
            eprintln!("analyzing...");
        } else if !pending {
            seen.store(false, Ordering::Relaxed);
        }
    });

    eprintln!("type :help for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match repl_line(dashboard, line, offset).await {
            Ok(ReplAction::Quit) => break,
            Ok(ReplAction::Continue) => {}
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

async fn repl_line(dashboard: &mut CliDashboard, line: &str, offset: UtcOffset) -> Result<ReplAction, CliError> {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((c, rest)) => (c, rest.trim()),
        None => (line, ""),
    };

    match command {
        ":quit" | ":q" => return Ok(ReplAction::Quit),
        ":help" => println!("{REPL_HELP}"),
        ":history" => print!("{}", render_history(&dashboard.store().state().history, offset)),
        ":use" => {
            if dashboard.select_history(arg) {
                submit_and_print(dashboard).await;
            } else {
                eprintln!("no history entry {arg:?}");
            }
        }
        ":rm" => dashboard.remove_history(arg),
        ":clear-history" => dashboard.clear_history(),
        ":clear" => {
            dashboard.clear_results();
            print!("{}", render_results(dashboard.store().state()));
        }
        ":suggest" => {
            if arg.is_empty() {
                dashboard.load_default_suggestions().await;
            } else {
                dashboard.set_query_text(arg);
                dashboard.refresh_suggestions().await;
            }
            for suggestion in &dashboard.store().state().suggestions {
                println!("  {suggestion}");
            }
        }
        ":export" => {
            let path = if arg.is_empty() { Path::new(".") } else { Path::new(arg) };
            let written = write_export(dashboard, path).await?;
            println!("exported {}", written.display());
        }
        _ if command.starts_with(':') => eprintln!("unknown command {command}; try :help"),
        _ => {
            dashboard.set_query_text(line);
            submit_and_print(dashboard).await;
        }
    }
    Ok(ReplAction::Continue)
}

async fn submit_and_print(dashboard: &mut CliDashboard) {
    if let SubmitStatus::Aborted(e) = dashboard.submit().await {
        tracing::debug!(error = %e, "submit aborted");
    }
    print!("{}", render_results(dashboard.store().state()));
}
