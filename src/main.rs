use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use spanview::config::Config;
use spanview::format::format_duration;
use spanview::grid::filter::{error_count, tag_stats};
use spanview::grid::flatten;
use spanview::trace::{load_trace, normalize, sample_trace, NormalizedTrace};
use spanview::tui::{
    self,
    views::{ChainView, GridView, TimelineView},
};
use spanview::{Locale, Result};

#[derive(Parser, Debug)]
#[command(name = "spanview")]
#[command(author, version, about = "Tree-grid viewer for distributed tracing spans")]
#[command(long_about = "Explore nested tracing spans as a collapsible tree-grid.\n\n\
    Highlight spans by component tag, keyword or error status, step through the\n\
    matches, and keep key columns pinned while scrolling sideways.\n\n\
    Without a subcommand, opens the span timeline viewer.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Write diagnostics to this file (the viewer owns the terminal)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Override the configured locale
    #[arg(long, global = true, value_enum)]
    locale: Option<Locale>,

    /// Do not reload when the input file changes
    #[arg(long, global = true)]
    no_watch: bool,

    /// Pin a column by key (repeatable); replaces the configured pins
    #[arg(long = "sticky", global = true)]
    sticky: Vec<String>,

    /// Hide the highlighter toolbar
    #[arg(long, global = true)]
    no_highlighter: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the span timeline viewer
    View {
        /// Trace JSON file (defaults to the bundled sample)
        file: Option<PathBuf>,
    },
    /// Open the call-chain metrics viewer
    Chain {
        /// Chain JSON file (defaults to the bundled sample)
        file: Option<PathBuf>,
    },
    /// Print the normalized trace as JSON
    Normalize {
        /// Trace JSON file (defaults to the bundled sample)
        file: Option<PathBuf>,

        /// Compact output instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Summarize a trace: span count, time window, errors and tags
    Stats {
        /// Trace JSON file (defaults to the bundled sample)
        file: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let args = Cli::parse();

    let is_viewer = matches!(
        args.command,
        None | Some(Command::View { .. }) | Some(Command::Chain { .. })
    );
    init_logging(args.log_file.as_deref(), is_viewer);

    if let Err(e) = run(args) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// The viewer owns the terminal, so it only logs when a file is given
fn init_logging(log_file: Option<&Path>, is_viewer: bool) {
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_env_var("SPANVIEW_LOG")
        .with_default_directive(tracing::Level::WARN.into())
        .from_env_lossy();

    match log_file {
        Some(path) => match File::create(path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
            Err(e) => eprintln!("Warning: cannot open log file {}: {}", path.display(), e),
        },
        None if !is_viewer => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
        None => {}
    }
}

/// Command-line overrides applied on top of the config file
struct ViewerFlags {
    locale: Option<Locale>,
    sticky: Vec<String>,
    no_watch: bool,
    no_highlighter: bool,
}

fn run(args: Cli) -> Result<()> {
    let config = Config::load();
    let flags = ViewerFlags {
        locale: args.locale,
        sticky: args.sticky,
        no_watch: args.no_watch,
        no_highlighter: args.no_highlighter,
    };

    match args.command.unwrap_or(Command::View { file: None }) {
        Command::View { file } => {
            let view = TimelineView::new(file, config.timeline.clone());
            open_viewer(view, &config, &flags)
        }
        Command::Chain { file } => open_viewer(ChainView::new(file), &config, &flags),
        Command::Normalize { file, compact } => {
            let trace = read_normalized(file.as_deref())?;
            let json = if compact {
                serde_json::to_string(&trace)?
            } else {
                serde_json::to_string_pretty(&trace)?
            };
            println!("{}", json);
            Ok(())
        }
        Command::Stats { file } => {
            let trace = read_normalized(file.as_deref())?;
            print_stats(&trace);
            Ok(())
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "spanview", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn open_viewer<V: GridView>(view: V, config: &Config, flags: &ViewerFlags) -> Result<()> {
    let mut options = config.grid_options(view.default_sticky());
    if let Some(locale) = flags.locale {
        options.locale = locale;
    }
    if !flags.sticky.is_empty() {
        options.sticky_cols = flags.sticky.clone();
    }
    if flags.no_highlighter {
        options.show_highlighter = false;
    }
    tracing::info!(view = %view.title(options.locale), locale = options.locale.as_str(), "opening viewer");
    tui::run(view, options, config.grid.watch && !flags.no_watch)
}

fn read_normalized(file: Option<&Path>) -> Result<NormalizedTrace> {
    let raw = match file {
        Some(path) => load_trace(path)?,
        None => sample_trace()?,
    };
    Ok(normalize(&raw))
}

fn print_stats(trace: &NormalizedTrace) {
    let flat = flatten(&trace.nodes);
    let errors = error_count(&flat);

    println!("\n{}", "Trace summary".cyan().bold());
    println!("   Spans:    {}", flat.len());
    println!("   Roots:    {}", trace.nodes.len());
    println!("   Start:    {}", trace.start_us);
    println!("   Duration: {}", format_duration(trace.total_us));
    if errors > 0 {
        println!("   Errors:   {}", errors.to_string().red());
    } else {
        println!("   Errors:   {}", "0".green());
    }

    let stats = tag_stats(&flat);
    if !stats.is_empty() {
        println!("\n{}", "Components".cyan().bold());
        for stat in stats {
            println!("   {:<16} {}", stat.tag, stat.count);
        }
    }
}
