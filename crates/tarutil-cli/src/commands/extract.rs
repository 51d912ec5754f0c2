//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use crate::error::convert_extraction_error;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use std::env;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use tarutil_core::extract_all_with_report;

/// Extensions of compressed tarballs, which must be decompressed before extraction.
const COMPRESSED_EXTENSIONS: &[&str] = &["gz", "tgz", "bz2", "tbz2", "xz", "txz", "zst", "tzst"];

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let root = match &args.root {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let reader: Box<dyn Read> = if args.reads_stdin() {
        Box::new(io::stdin().lock())
    } else {
        if looks_compressed(&args.archive) {
            formatter.format_warning(&format!(
                "'{}' looks compressed; only plain tar streams are supported",
                args.archive.display()
            ));
        }
        let file = File::open(&args.archive)
            .with_context(|| format!("failed to open archive '{}'", args.archive.display()))?;
        Box::new(file)
    };

    let options = args.options();
    tracing::debug!(
        archive = %args.archive.display(),
        root = %root.display(),
        ?options,
        "starting extraction"
    );

    let mut report = add_archive_context(
        extract_all_with_report(reader, &root, options),
        &args.archive,
    )?;
    let failure = report.take_error();

    formatter.format_extraction_result(&report, failure.as_ref())?;

    match failure {
        Some(err) => Err(convert_extraction_error(err, &args.archive)),
        None => Ok(()),
    }
}

fn looks_compressed(archive: &Path) -> bool {
    archive
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            COMPRESSED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
