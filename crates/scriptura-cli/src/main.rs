use anyhow::Result;
use clap::{Parser, Subcommand};
use scriptura_acquire::{
    AcquireError, AcquirePlan, ChapterRequest, FetchConfig, Fetcher, RunObserver,
    DEFAULT_CONCURRENCY,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "scriptura")]
#[command(about = "Bible chapter acquisition, export, and verification tool")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch chapters into a tree of chapter documents
    Fetch {
        /// Bible version code (e.g. PDT, NTV, RVR60)
        #[arg(long)]
        version: String,

        /// Book name or alias (e.g. Genesis, Salmos). Omit for all 66 books
        #[arg(long)]
        book: Option<String>,

        /// Chapter selector: "all", or a list like "1-5,8,10"
        #[arg(long, default_value = "all")]
        chapters: String,

        /// Destination root for the chapter tree
        #[arg(long, default_value = "./data")]
        dest: PathBuf,

        /// Maximum number of chapters fetched concurrently
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },

    /// Reshape a chapter tree into FreeShow .fsb.json exports
    Export {
        /// Root of the chapter tree (containing PDT/, NTV/, ...)
        root: PathBuf,

        /// Output directory for the export files
        #[arg(long, default_value = "exports")]
        outdir: PathBuf,

        /// Export only these versions (default: all detected)
        #[arg(long, num_args = 1..)]
        versions: Vec<String>,
    },

    /// Verify a chapter tree against the on-disk contract
    Verify {
        /// Root of the chapter tree
        root: PathBuf,
    },

    /// List the 66 books of the catalog
    Books,
}

/// Console progress bar fed by the orchestrator's completion events.
struct ProgressBarObserver {
    bar: indicatif::ProgressBar,
}

impl ProgressBarObserver {
    fn new() -> Self {
        Self {
            bar: indicatif::ProgressBar::hidden(),
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl RunObserver for ProgressBarObserver {
    fn run_started(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_style(
            indicatif::ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} chapters {msg}",
            )
            .expect("valid progress template"),
        );
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn unit_finished(&self, request: &ChapterRequest, error: Option<&AcquireError>) {
        if error.is_none() {
            self.bar.set_message(request.to_string());
        }
        self.bar.inc(1);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(
                time_format.to_string(),
            ))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
                time_format.to_string(),
            ))
            .init();
    }

    match cli.command {
        Commands::Fetch {
            version,
            book,
            chapters,
            dest,
            concurrency,
        } => {
            tracing::info!(version = %version, book = ?book, chapters = %chapters, "Fetching chapters");

            let fetcher = Arc::new(Fetcher::new(FetchConfig::default())?);
            let plan = AcquirePlan::new(&version, book.as_deref(), &chapters);

            let cancel = CancellationToken::new();
            {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        tracing::warn!("Interrupt received; letting in-flight chapters finish");
                        cancel.cancel();
                    }
                });
            }

            let observer = Arc::new(ProgressBarObserver::new());
            let summary = scriptura_acquire::run(
                &plan,
                &dest,
                fetcher,
                concurrency,
                cancel,
                observer.clone(),
            )
            .await?;
            observer.finish();

            for (request, error) in &summary.failed {
                tracing::warn!(unit = %request, error = %error, "Failed chapter");
            }
            tracing::info!(
                succeeded = summary.succeeded.len(),
                failed = summary.failed.len(),
                cancelled = summary.cancelled,
                "Fetch complete"
            );
            if summary.succeeded.is_empty() {
                anyhow::bail!("no chapters were acquired");
            }
        }
        Commands::Export {
            root,
            outdir,
            versions,
        } => {
            tracing::info!(root = %root.display(), outdir = %outdir.display(), "Exporting");
            let written = scriptura_export::export_tree(&root, &outdir, &versions)?;
            tracing::info!(files = written.len(), "Export complete");
        }
        Commands::Verify { root } => {
            tracing::info!(root = %root.display(), "Verifying chapter tree");
            let issues = scriptura_validate::verify_tree(&root)?;
            if !issues.is_empty() {
                anyhow::bail!("{} contract violations found", issues.len());
            }
            tracing::info!("Chapter tree is valid");
        }
        Commands::Books => {
            for book in scriptura_model::all_books() {
                println!(
                    "{:02}  {:<4} {:>3}  {}",
                    book.order, book.code, book.chapters, book.name
                );
            }
        }
    }

    Ok(())
}
