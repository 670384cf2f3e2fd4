mod dump;
mod merge;
mod prompt;

use clap::{Parser, Subcommand};
use tracing::{error, info, metadata::LevelFilter};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Subcommand)]
enum Command {
    /// Merge enums selected from a type archive into a new enum.
    ///
    /// The merged enum is added to the archive, and its listing is printed to stdout.
    Merge(merge::Args),

    /// Print the types stored in one or more type archives.
    Dump(dump::Args),
}

#[derive(Parser)]
#[clap(version)]
struct Args {
    /// Tool to run.
    #[clap(subcommand)]
    command: Command,
}

fn fallible_main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Merge(args) => merge::merge(args)?,
        Command::Dump(args) => dump::dump(args)?,
    }

    Ok(())
}

fn main() {
    let subscriber = tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        );
    tracing::subscriber::set_global_default(subscriber)
        .expect("cannot set default tracing subscriber");

    info!("enumkit version {}", env!("CARGO_PKG_VERSION"));

    match fallible_main() {
        Ok(_) => (),
        Err(err) => {
            error!("in fallible_main: {err:?}");
        }
    }
}
