//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Extcheck - extension compatibility checker
///
/// Analyse platform extension archives for conflicts against baseline
/// platform releases.
#[derive(Parser, Debug)]
#[command(
    name = "extcheck",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Compatibility checker for platform extension archives",
    long_about = "Extcheck detects compatibility conflicts between a custom platform \
                  extension archive (.amp, .jar) and baseline platform releases: \
                  overwritten files and beans, classpath collisions, and usage of \
                  internal or bundled code that may change between releases.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  extcheck inventory platform-6.0.0.war --version 6.0.0 -o reports/6.0.0.json\n    \
                  extcheck analyse my-extension.amp --store reports/\n    \
                  extcheck analyse my-extension.amp --store reports/ --target-version 6.0.0-6.2.1\n    \
                  extcheck list-versions --store reports/"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyse an extension archive against baseline release inventories
    Analyse(AnalyseArgs),

    /// Generate the inventory report of an archive
    Inventory(InventoryArgs),

    /// List the baseline versions known to an inventory store
    ListVersions(ListVersionsArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the analyse command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Analyse against every known baseline version:\n    \
                  extcheck analyse ext.amp --store reports/\n\n\
                  Analyse against one version:\n    \
                  extcheck analyse ext.amp --store reports/ --target-version 6.0.0\n\n\
                  Analyse against an inclusive range:\n    \
                  extcheck analyse ext.amp --store reports/ --target-version 6.0.0-6.2.1\n\n\
                  Machine-readable output:\n    \
                  extcheck analyse ext.amp --store reports/ --json")]
pub struct AnalyseArgs {
    /// Extension archive to analyse (.amp or .jar)
    pub archive: PathBuf,

    /// Directory of baseline inventory reports (JSON)
    #[arg(long, env = "EXTCHECK_STORE")]
    pub store: PathBuf,

    /// Baseline version or inclusive range (e.g. 6.0.0 or 6.0.0-6.2.1);
    /// repeatable. Defaults to every version in the store.
    #[arg(long = "target-version", value_name = "VERSION")]
    pub target_versions: Vec<String>,

    /// Package prefix of the platform's internal code
    #[arg(long, value_name = "PACKAGE", default_value = "org.alfresco")]
    pub internal_prefix: String,

    /// JSON array of bean ids exempt from the overwrite check
    #[arg(long, value_name = "FILE")]
    pub bean_override_allowlist: Option<PathBuf>,

    /// JSON array of bean classes exempt from the restricted-class check
    #[arg(long, value_name = "FILE")]
    pub restricted_class_allowlist: Option<PathBuf>,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the inventory command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Baseline release inventory:\n    \
                  extcheck inventory platform-6.0.0.war --version 6.0.0 -o reports/6.0.0.json\n\n\
                  Extension inventory to stdout:\n    \
                  extcheck inventory ext.amp")]
pub struct InventoryArgs {
    /// Archive to inventory (.war, .amp or .jar)
    pub archive: PathBuf,

    /// Version tag to embed in the report (required for baseline reports)
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,

    /// Package prefix of the platform's internal code
    #[arg(long, value_name = "PACKAGE", default_value = "org.alfresco")]
    pub internal_prefix: String,

    /// Qualified annotation marking public API classes
    #[arg(
        long,
        value_name = "ANNOTATION",
        default_value = "org.alfresco.api.AlfrescoPublicApi"
    )]
    pub public_api_annotation: String,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the list-versions command
#[derive(Parser, Debug)]
pub struct ListVersionsArgs {
    /// Directory of baseline inventory reports (JSON)
    #[arg(long, env = "EXTCHECK_STORE")]
    pub store: PathBuf,
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyse_args_parse() {
        let cli = Cli::parse_from([
            "extcheck",
            "analyse",
            "ext.amp",
            "--store",
            "reports",
            "--target-version",
            "6.0.0",
            "--target-version",
            "6.1.0-6.2.1",
            "--json",
        ]);
        let Commands::Analyse(args) = cli.command else {
            panic!("expected analyse");
        };
        assert_eq!(args.archive, PathBuf::from("ext.amp"));
        assert_eq!(args.target_versions, ["6.0.0", "6.1.0-6.2.1"]);
        assert!(args.json);
        assert_eq!(args.internal_prefix, "org.alfresco");
    }

    #[test]
    fn test_inventory_args_parse() {
        let cli = Cli::parse_from([
            "extcheck",
            "inventory",
            "platform.war",
            "--version",
            "6.0.0",
            "-o",
            "out.json",
        ]);
        let Commands::Inventory(args) = cli.command else {
            panic!("expected inventory");
        };
        assert_eq!(args.version.as_deref(), Some("6.0.0"));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["extcheck", "list-versions", "--store", "reports", "-v"]);
        assert!(cli.verbose);
    }
}
