//! Inventory CLI entry point.

use clap::Parser;
use inventory::cli::commands::{self, item, resource, stock};
use inventory::cli::{Cli, Commands, OutputFormat};
use inventory::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.silent {
        inventory::SILENT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.format == OutputFormat::Csv {
        inventory::CSV_OUTPUT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR --format json OR non-TTY stdout
    let json = cli.json
        || cli.format == OutputFormat::Json
        || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let db = cli.db.as_ref();

    match &cli.command {
        Commands::Init { force } => commands::init::execute(db, *force, json),
        Commands::Version => commands::version::execute(json),

        // Items
        Commands::Add(args) => item::add(args, db, json),
        Commands::Sample => item::sample(db, json),
        Commands::List(args) => item::list(args, db, json),
        Commands::Show { id } => item::show(*id, db, json),
        Commands::Edit(args) => item::edit(args, db, json),
        Commands::Delete { id } => item::delete(*id, db, json),
        Commands::Clear { yes } => item::clear(*yes, db, json),

        // Stock
        Commands::Sell { id, count } => stock::sell(*id, *count, db, json),
        Commands::Adjust { id, delta } => stock::adjust(*id, *delta, db, json),

        // Resources
        Commands::Type { uri } => resource::type_of(uri, json),
        Commands::Reset { yes } => resource::reset(*yes, db, json),

        // Shell completions
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
