use std::{io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use enumkit_listing::structure::{Listing, ListingFlags};
use enumkit_types::{
    host::{create_enum_from_selection, ArchiveHost, FixedPrompt, NamePrompt},
    DataType, TypeArchive,
};
use tracing::{debug, info, warn};

use crate::prompt::TerminalPrompt;

#[derive(Debug, Parser)]
pub struct Args {
    /// Type archive containing the enums to merge.
    archive: PathBuf,

    /// Name of an enum to merge. Pass at least twice.
    ///
    /// Enums are merged in the order they are selected; when two of them define the same entry
    /// name with different values, the later one gets renamed.
    #[clap(short, long = "select", required = true)]
    selection: Vec<String>,

    /// Name of the new enum.
    ///
    /// If omitted, the name is asked for on the terminal. If the name is already taken, the merge
    /// is cancelled.
    #[clap(short, long)]
    name: Option<String>,

    /// Where to save the archive with the merged enum. Defaults to overwriting the input archive.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Print values of the merged enum in hexadecimal.
    #[clap(long)]
    hex: bool,
}

pub fn merge(args: Args) -> anyhow::Result<()> {
    let mut archive = TypeArchive::load(&args.archive)?;
    info!(
        "Loaded archive {} with {} types ({} enums)",
        archive.name,
        archive.types().len(),
        archive.enums().count()
    );

    let committed = match args.name {
        Some(name) => run(&mut archive, FixedPrompt::new(name), &args.selection)?,
        None => {
            let stdin = io::stdin();
            let prompt = TerminalPrompt::new(stdin.lock(), io::stderr());
            run(&mut archive, prompt, &args.selection)?
        }
    };
    let Some(committed) = committed else {
        warn!("Merge cancelled; archive left unchanged");
        return Ok(());
    };

    let output = args.output.as_ref().unwrap_or(&args.archive);
    archive
        .save(output)
        .with_context(|| format!("cannot save archive with merged enum {committed}"))?;
    info!(?output, "Saved archive");

    if let Some(DataType::Enum(def)) = archive.get(&committed) {
        let mut flags = ListingFlags::COMMENTS;
        if args.hex {
            flags |= ListingFlags::HEX;
        }
        let listing = Listing::new(def)
            .with_flags(flags)
            .render()
            .with_context(|| format!("cannot write listing of {committed}"))?;
        print!("{listing}");
    }

    Ok(())
}

fn run(
    archive: &mut TypeArchive,
    prompt: impl NamePrompt,
    selection: &[String],
) -> anyhow::Result<Option<String>> {
    debug!(?selection, "Merging selection");
    let mut host = ArchiveHost::new(archive, prompt);
    create_enum_from_selection(&mut host, selection).context("cannot create enum from selection")
}
