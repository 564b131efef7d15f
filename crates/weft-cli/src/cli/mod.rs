//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "weft",
    bin_name = "weft",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Template-driven code weaving for MVVM solutions",
    long_about = "Weft creates view models, views and tests from item templates \
                  and weaves navigation commands into existing view models.",
    after_help = "EXAMPLES:\n\
        \x20 weft generate OrdersViewModel --view App.Droid --tests --from HomeViewModel\n\
        \x20 weft names OrdersViewModel\n\
        \x20 weft dependency plugin.toml --project App.Core --use-package-manager\n\
        \x20 weft completions bash > /usr/share/bash-completion/completions/weft",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a view model with its views and wire up navigation.
    #[command(
        visible_alias = "g",
        about = "Generate a view model, views and navigation wiring",
        after_help = "EXAMPLES:\n\
            \x20 weft generate OrdersViewModel --yes\n\
            \x20 weft generate OrdersViewModel --view App.Droid --view App.iOS\n\
            \x20 weft generate OrdersViewModel --tests --from HomeViewModel --to DetailViewModel"
    )]
    Generate(GenerateArgs),

    /// Show the command names derived from a view model name.
    #[command(
        about = "Print derived command names",
        after_help = "EXAMPLES:\n\
            \x20 weft names OrdersViewModel   # OrdersCommand / ordersCommand"
    )]
    Names(NamesArgs),

    /// Resolve how a plugin dependency is acquired.
    #[command(
        visible_alias = "dep",
        about = "Resolve a plugin dependency",
        after_help = "EXAMPLES:\n\
            \x20 weft dependency plugin.toml --project App.Core\n\
            \x20 weft dependency plugin.json --project App.Core --use-package-manager\n\
            \x20 weft dependency plugin.toml --project App.Core --apply-code"
    )]
    Dependency(DependencyArgs),

    /// Initialise a Weft configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 weft init           # default location\n\
            \x20 weft init --local   # .weft.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 weft completions bash > ~/.local/share/bash-completion/completions/weft\n\
            \x20 weft completions zsh  > ~/.zfunc/_weft\n\
            \x20 weft completions fish > ~/.config/fish/completions/weft.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Weft configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 weft config get weave.test_framework\n\
            \x20 weft config list\n\
            \x20 weft config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `weft generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// View model name, e.g. `OrdersViewModel`.
    #[arg(value_name = "NAME", help = "View model name")]
    pub name: String,

    /// Project receiving the view model.  Defaults to the first project
    /// ending with `weave.core_project_suffix`.
    #[arg(
        short = 'p',
        long = "project",
        value_name = "PROJECT",
        help = "Project receiving the view model"
    )]
    pub project: Option<String>,

    /// Projects that each receive a view.
    #[arg(
        long = "view",
        value_name = "PROJECT",
        help = "Add a view to this project (repeatable)"
    )]
    pub views: Vec<String>,

    /// Also create and adapt a unit test.
    #[arg(short = 't', long = "tests", help = "Create a unit test for the view model")]
    pub tests: bool,

    /// Existing view model that should navigate to the new one.
    #[arg(long = "from", value_name = "VIEW_MODEL", help = "Wire navigation from this view model")]
    pub from: Option<String>,

    /// Existing view model the new one should navigate to.
    #[arg(long = "to", value_name = "VIEW_MODEL", help = "Wire navigation to this view model")]
    pub to: Option<String>,

    /// Solution root.
    #[arg(
        short = 'r',
        long = "root",
        value_name = "DIR",
        default_value = ".",
        help = "Solution root directory"
    )]
    pub root: PathBuf,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation and generate immediately")]
    pub yes: bool,

    /// Describe the artifacts without writing anything.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,
}

// ── names ─────────────────────────────────────────────────────────────────────

/// Arguments for `weft names`.
#[derive(Debug, Args)]
pub struct NamesArgs {
    /// Symbolic name, e.g. `OrdersViewModel`.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Suffix to strip (overrides `weave.suffix`).
    #[arg(long = "suffix", value_name = "SUFFIX")]
    pub suffix: Option<String>,
}

// ── dependency ────────────────────────────────────────────────────────────────

/// Arguments for `weft dependency`.
#[derive(Debug, Args)]
pub struct DependencyArgs {
    /// Dependency descriptor (`.toml` or `.json`).
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: PathBuf,

    /// Project the dependency is added to.
    #[arg(short = 'p', long = "project", value_name = "PROJECT")]
    pub project: String,

    /// Name used for the bootstrap file.  Defaults to the descriptor file stem.
    #[arg(long = "friendly-name", value_name = "NAME")]
    pub friendly_name: Option<String>,

    /// Directory holding the bundled reference files.
    #[arg(long = "source-dir", value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Library folder the references are copied into.  Defaults to `<root>/lib`.
    #[arg(long = "destination-dir", value_name = "DIR")]
    pub destination_dir: Option<PathBuf>,

    /// Prefer the package manager (overrides `dependencies.use_package_manager`).
    #[arg(long = "use-package-manager")]
    pub use_package_manager: bool,

    /// Weave the descriptor's code dependencies into the solution.
    #[arg(long = "apply-code")]
    pub apply_code: bool,

    /// Solution root.
    #[arg(short = 'r', long = "root", value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `weft init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.weft.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `weft completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `weft config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `weave.insert_position`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
