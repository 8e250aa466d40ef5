//! addonctl CLI - installs cluster add-ons (registry, router, DNS)

use addonctl::commands::install::InstallOptions;
use addonctl::config::Settings;
use addonctl::install::AddonKind;
use addonctl::utils::{DryRun, ErrorReport, logger};
use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "addonctl")]
#[command(author, version, about = "Install registry, router and DNS add-ons into a cluster", long_about = None)]
struct Cli {
    /// Verbose output (can be used multiple times: -v, -vv, -vvv)
    /// -v: INFO, -vv: DEBUG, -vvv: TRACE
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dry-run mode: show what would be done without making changes
    #[arg(long, global = true)]
    dry_run: bool,

    /// Path to kubeconfig file
    #[arg(short, long, global = true, env = "KUBECONFIG")]
    kubeconfig: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install add-ons
    Install {
        #[command(flatten)]
        args: InstallArgs,

        #[command(subcommand)]
        command: InstallCommands,
    },

    /// Check prerequisites and cluster health
    Check {
        #[command(subcommand)]
        command: CheckCommands,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct InstallArgs {
    /// Server configuration directory (signer material lives in <dir>/master)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Image tag substituted into the image template
    #[arg(short, long, global = true, value_parser = non_empty)]
    tag: Option<String>,

    /// IP the router's default certificate is issued for
    #[arg(long, global = true)]
    host_ip: Option<String>,

    /// Skip preflight validation
    #[arg(long, global = true)]
    skip_preflight: bool,
}

#[derive(Subcommand)]
enum InstallCommands {
    /// Install the integrated image registry
    Registry,

    /// Install the router, its service account, SCC grant and default certificate
    Router,

    /// Install the registry, then the router
    All,

    /// Apply the DNS daemon set
    Dns,
}

#[derive(Subcommand)]
enum CheckCommands {
    /// Check that oc and kubectl are installed
    Prereqs,

    /// Report pods denied by security context constraints
    SccDenials {
        /// Fail if any denial is found
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print an example configuration file
    Example,
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    if let Err(e) = run(cli) {
        ErrorReport::from_error(&e).display();
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let dry_run = DryRun::from(cli.dry_run);
    if dry_run.is_enabled() {
        addonctl::log_info!("DRY RUN MODE: No changes will be made");
        println!();
    }

    match cli.command {
        Commands::Install { args, command } => {
            let options = InstallOptions {
                kubeconfig: cli.kubeconfig,
                config_dir: args.config_dir,
                image_tag: args.tag,
                host_ip: args.host_ip,
                skip_preflight: args.skip_preflight,
                dry_run,
            };
            handle_install_command(command, &options)
        }
        Commands::Check { command } => handle_check_command(command, cli.kubeconfig),
        Commands::Config { command } => handle_config_command(command),
        Commands::Completion { shell } => handle_completion_command(shell),
        Commands::Version => handle_version_command(),
    }
}

fn handle_install_command(command: InstallCommands, options: &InstallOptions) -> Result<()> {
    use addonctl::commands::install;

    match command {
        InstallCommands::Registry => install::install_addons(&[AddonKind::Registry], options),
        InstallCommands::Router => install::install_addons(&[AddonKind::Router], options),
        InstallCommands::All => {
            install::install_addons(&[AddonKind::Registry, AddonKind::Router], options)
        }
        InstallCommands::Dns => install::install_dns(options),
    }
}

fn handle_check_command(command: CheckCommands, kubeconfig: Option<PathBuf>) -> Result<()> {
    use addonctl::commands::check;

    match command {
        CheckCommands::Prereqs => check::prereqs(),
        CheckCommands::SccDenials { strict } => {
            check::scc_denials_command(kubeconfig.as_deref(), strict)
        }
    }
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Example => {
            print!("{}", Settings::example_config()?);
            Ok(())
        }
    }
}

fn handle_completion_command(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "addonctl", &mut io::stdout());
    Ok(())
}

fn handle_version_command() -> Result<()> {
    println!("addonctl {}", env!("CARGO_PKG_VERSION"));
    println!("Cluster add-on installer");
    Ok(())
}
