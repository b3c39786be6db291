mod cli;
mod config;
mod import;
mod output;
mod payload;
mod prompt;
mod role;

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "mrs-register",
    about = "Build an MRS registration payload and the curl command to submit it"
)]
pub struct Args {
    #[arg(long, env = "MRS_ENDPOINT", help = "Registration endpoint URL")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Admin key (overrides config and $MRS_ADMIN_KEY)")]
    pub admin_key: Option<String>,

    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Import students from a CSV file (name,email,password)")]
    pub csv: Option<PathBuf>,

    #[arg(long, help = "Read plain lines from stdin instead of the line editor")]
    pub stdin: bool,

    #[arg(long, help = "Pretty-print the JSON payload")]
    pub pretty: bool,

    #[arg(short, long, help = "Suppress the banner")]
    pub quiet: bool,

    #[arg(long, help = "Show resolved endpoint and admin key source, then exit")]
    pub show_config: bool,

    #[arg(long, help = "Verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Debug output (print settings)")]
    pub debug: bool,
}

/// Load the config layers (or `--config`), apply CLI overrides, validate
fn resolve_config(args: &Args, home: Option<&Path>, project: &Path) -> Result<config::Config> {
    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_with_defaults(config_path)?
    } else {
        config::Config::load_layers(home, project)?
    };

    cfg.apply_overrides(args.endpoint.as_deref(), args.admin_key.as_deref());

    if let Err(errors) = cfg.validate() {
        for error in &errors {
            eprintln!("Config error {}", error);
        }
        return Err(anyhow!(
            "invalid configuration ({} problem(s))",
            errors.len()
        ));
    }

    Ok(cfg)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let cfg = resolve_config(&args, dirs::home_dir().as_deref(), Path::new("."))?;

    let ctx = cli::Context { args, config: cfg };

    if ctx.args.verbose || ctx.args.debug {
        for path in &ctx.config.sources {
            eprintln!("[VERBOSE] Loaded config {}", path.display());
        }
    }

    let mut stdout = io::stdout();
    if ctx.args.show_config {
        return cli::show_config(&ctx, &mut stdout);
    }

    if let Some(csv_path) = &ctx.args.csv {
        return cli::run_import(&ctx, csv_path, &mut stdout);
    }

    if ctx.args.stdin {
        let mut source = prompt::Plain::new(io::stdin().lock(), io::stdout());
        cli::run_session(&ctx, &mut source, &mut stdout)
    } else {
        let mut source = prompt::Terminal::new()?;
        cli::run_session(&ctx, &mut source, &mut stdout)
    }
}
