use std::io;
use std::process::ExitCode;

use clap::Parser;
use psi::parse::MAX_SYMBOL_BYTES;
use psi::repl::{Repl, ReplConfig, DEFAULT_PROMPT, MAX_LINE_BYTES};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, registry::Registry, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Read-eval-print loop for a minimal S-expression language",
    long_about = None
)]
struct Cli {
    #[arg(long, default_value = DEFAULT_PROMPT)]
    /// Text printed before each line is read
    prompt: String,

    #[arg(long)]
    /// Do not print a prompt (useful when piping input)
    no_prompt: bool,

    #[arg(long, default_value_t = MAX_LINE_BYTES)]
    /// Longest accepted input line in bytes, excluding the newline
    max_line_bytes: usize,

    #[arg(long, default_value_t = MAX_SYMBOL_BYTES)]
    /// Longest accepted symbol in bytes
    max_symbol_bytes: usize,
}

impl Cli {
    fn into_config(self) -> ReplConfig {
        ReplConfig {
            prompt: if self.no_prompt { None } else { Some(self.prompt) },
            max_line_bytes: self.max_line_bytes,
            max_symbol_bytes: self.max_symbol_bytes,
        }
    }
}

fn init_logger() {
    let filter = EnvFilter::from_default_env();

    // stdout carries the REPL transcript, so logs go to stderr
    let layer = tracing_tree::HierarchicalLayer::default()
        .with_writer(io::stderr)
        .with_indent_lines(true)
        .with_indent_amount(2)
        .with_verbose_entry(false)
        .with_verbose_exit(false)
        .with_targets(true);

    let subscriber = Registry::default().with(layer).with(filter);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("psi: a global tracing subscriber was already installed");
    }
}

fn main() -> ExitCode {
    init_logger();

    info!("parsing command line arguments");
    let config = Cli::parse().into_config();
    info!(?config, "starting repl");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut repl = Repl::new(stdin.lock(), stdout.lock(), config);
    match repl.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(%e, "i/o failure");
            eprintln!("psi: {}", e);
            ExitCode::FAILURE
        },
    }
}
