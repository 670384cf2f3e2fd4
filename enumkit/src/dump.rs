use std::{ffi::OsStr, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use enumkit_listing::{structure::ListingFlags, writer::ListingWriter};
use enumkit_types::TypeArchive;
use tracing::{debug, debug_span};
use walkdir::WalkDir;

#[derive(Debug, Parser)]
pub struct Args {
    /// Type archives to print, or directories to search for them.
    ///
    /// Directories are searched recursively for .json files.
    #[clap(required = true)]
    paths: Vec<PathBuf>,

    /// Print values in hexadecimal.
    #[clap(long)]
    hex: bool,

    /// Do not print entry comments.
    #[clap(long)]
    no_comments: bool,

    /// Print which archive each enum was committed to.
    #[clap(long)]
    sources: bool,
}

impl Args {
    fn flags(&self) -> ListingFlags {
        let mut flags = ListingFlags::empty();
        flags.set(ListingFlags::HEX, self.hex);
        flags.set(ListingFlags::COMMENTS, !self.no_comments);
        flags.set(ListingFlags::SOURCE, self.sources);
        flags
    }
}

/// Expands directories into the archive files they contain, keeping explicitly named files as-is.
fn find_archives(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut archive_paths = vec![];
    for path in paths {
        if path.is_file() {
            archive_paths.push(path.to_owned());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("cannot search {path:?} for archives"))?;
            let path = entry.path();
            if path.is_file() && path.extension() == Some(OsStr::new("json")) {
                archive_paths.push(path.to_owned());
            }
        }
    }
    Ok(archive_paths)
}

pub fn dump(args: Args) -> anyhow::Result<()> {
    let flags = args.flags();
    let archive_paths = find_archives(&args.paths)?;
    debug!("{} archives found", archive_paths.len());

    for (i, path) in archive_paths.iter().enumerate() {
        let _span = debug_span!("dump", ?path).entered();
        let archive = TypeArchive::load(path)?;
        if i != 0 {
            println!();
        }
        let mut writer = ListingWriter::new(String::new(), flags);
        writer
            .write_archive(&archive)
            .with_context(|| format!("cannot write listing of {path:?}"))?;
        print!("{}", writer.into_inner());
    }

    Ok(())
}
