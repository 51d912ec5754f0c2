//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::Path;
use std::path::PathBuf;
use tarutil_core::ExtractOptions;

#[derive(Parser)]
#[command(name = "tarutil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a tar archive under a root directory
    Extract(ExtractArgs),
    /// Print shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractArgs {
    /// Path to the tar archive, or `-` for stdin
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Extraction root (default: current directory)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Create hard links (targets re-rooted under ROOT)
    #[arg(long)]
    pub link: bool,

    /// Create symbolic links (targets re-rooted under ROOT)
    #[arg(long)]
    pub symlink: bool,

    /// Apply numeric owner and group from the archive
    #[arg(long)]
    pub chown: bool,

    /// Apply permission bits from the archive (not to symlinks)
    #[arg(long)]
    pub chmod: bool,

    /// Apply access and modification times from the archive
    #[arg(long)]
    pub chtimes: bool,

    /// Enable all of the above
    #[arg(short = 'p', long)]
    pub preserve_all: bool,
}

impl ExtractArgs {
    /// Maps the flags onto the library option set.
    pub fn options(&self) -> ExtractOptions {
        if self.preserve_all {
            return ExtractOptions::preserve_all();
        }
        let mut options = ExtractOptions::empty();
        options.set(ExtractOptions::LINK, self.link);
        options.set(ExtractOptions::SYMLINK, self.symlink);
        options.set(ExtractOptions::CHOWN, self.chown);
        options.set(ExtractOptions::CHMOD, self.chmod);
        options.set(ExtractOptions::CHTIMES, self.chtimes);
        options
    }

    /// Returns `true` when the archive is read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.archive == Path::new("-")
    }
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ExtractArgs {
        let cli = Cli::try_parse_from(args).unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Extract(args) => args,
            Commands::Completion(_) => panic!("expected extract"),
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_options_are_empty() {
        let args = parse(&["tarutil", "extract", "layer.tar"]);
        assert_eq!(args.options(), ExtractOptions::empty());
        assert!(args.root.is_none());
        assert!(!args.reads_stdin());
    }

    #[test]
    fn test_flags_map_to_options() {
        let args = parse(&["tarutil", "extract", "-", "out", "--symlink", "--chmod"]);
        assert_eq!(
            args.options(),
            ExtractOptions::SYMLINK | ExtractOptions::CHMOD
        );
        assert_eq!(args.root.as_deref(), Some(Path::new("out")));
        assert!(args.reads_stdin());
    }

    #[test]
    fn test_preserve_all() {
        let args = parse(&["tarutil", "extract", "a.tar", "-p"]);
        assert_eq!(args.options(), ExtractOptions::preserve_all());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["tarutil", "-q", "-v", "extract", "a.tar"]).is_err());
    }
}
