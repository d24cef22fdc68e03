use anyhow::Result;
use clap::Parser;
use pubhook::commands::{self, RunOptions, default_installed_path, default_manifest_path, default_vendor_dir, project_root};
use pubhook::console::StdConsole;
use pubhook::manifest::Manifest;
use pubhook::package::JsonRegistry;
use pubhook::publish::ProcessInvoker;
use pubhook::runtime::RealRuntime;
use std::path::PathBuf;

/// pubhook - post-install publish hook runner
///
/// Run by the host package manager after installation completes. Reads the
/// project's `publish-cmd` handler and each installed package's publish
/// declaration, then invokes the handler once per declared entry as
/// `<publish-cmd> <type> <target> <source> <mode>`.
///
/// Examples:
///   pubhook run     # run the publish pass for the current project
#[derive(Parser, Debug)]
#[command(author, version = env!("PUBHOOK_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root directory (defaults to the current directory; also via PUBHOOK_PROJECT)
    #[arg(
        long = "project",
        short = 'p',
        env = "PUBHOOK_PROJECT",
        value_name = "DIR",
        global = true
    )]
    pub project: Option<PathBuf>,

    /// Project manifest path (defaults to <project>/publish.json)
    #[arg(long = "manifest", value_name = "PATH", global = true)]
    pub manifest: Option<PathBuf>,

    /// Installed-package registry path (defaults to <project>/vendor/installed.json)
    #[arg(long = "installed", value_name = "PATH", global = true)]
    pub installed: Option<PathBuf>,

    /// Vendor directory packages were installed under (defaults to <project>/vendor)
    #[arg(long = "vendor", value_name = "PATH", global = true)]
    pub vendor: Option<PathBuf>,

    /// Relay handler stdout for successful entries
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the publish pass over all installed packages
    Run(RunArgs),

    /// List declared publish entries without invoking the handler
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Print handler command lines instead of executing them
    #[arg(long = "dry-run", short = 'n')]
    pub dry_run: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let project = project_root(&runtime, cli.project)?;
    let manifest_path = cli.manifest.unwrap_or_else(|| default_manifest_path(&project));
    let installed_path = cli.installed.unwrap_or_else(|| default_installed_path(&project));
    let vendor_dir = cli.vendor.unwrap_or_else(|| default_vendor_dir(&project));

    let manifest = Manifest::load_or_default(&runtime, &manifest_path)?;
    let registry = JsonRegistry::new(&runtime, installed_path, vendor_dir);
    let console = StdConsole::new(cli.verbose);

    match cli.command {
        Commands::Run(args) => commands::run(
            &registry,
            &ProcessInvoker,
            &console,
            &manifest,
            &RunOptions {
                dry_run: args.dry_run,
            },
        ),
        Commands::List(_args) => commands::list(&registry, &console),
    }
}
