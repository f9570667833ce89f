use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use conduit::binding::module_table::ModuleTable;
use conduit::binding::process::ProcessBinding;
use conduit::consts::{ENGINE_MODULE, default_db_path};
use conduit::resolver::Resolver;
use conduit::{Bridge, RawCommand};

#[derive(Parser)]
#[command(name = "conduit", version, about = "Send commands to an out-of-process compute engine.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database holding the module table (default: ~/.conduit/conduit.db)
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// Module name the engine is registered under
    #[arg(short, long, default_value = ENGINE_MODULE)]
    module: String,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a command and print its result as JSON
    Exec {
        /// Command identifier, e.g. fibonacci
        cmd: String,
        /// Command parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,
    },
    /// Print the engine's home directory
    HomeDir,
    /// Manage the engine's module table entry
    Module {
        #[command(subcommand)]
        action: ModuleAction,
    },
}

#[derive(Subcommand)]
enum ModuleAction {
    /// Point the module at an engine executable
    Add {
        program: PathBuf,
        /// Extra arguments passed to the program on every call
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Remove the module entry
    Remove,
    /// Show the module entry
    Show,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries results; logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let db = match cli.db {
        Some(path) => path,
        None => default_db_path().context("cannot determine home directory")?,
    };
    if let Some(parent) = db.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let db = db.to_str().context("database path is not valid UTF-8")?;
    let table = ModuleTable::open(db, cli.module.as_str())?;

    match cli.command {
        Command::Module { action } => handle_module(&table, &cli.module, action),
        Command::Exec { cmd, params } => {
            let params = params
                .map(|p| serde_json::from_str(&p))
                .transpose()
                .context("--params is not valid JSON")?;
            let bridge = connect(table);
            let res = bridge.execute_raw(RawCommand::new(cmd, params)).await?;
            println!("{}", serde_json::to_string_pretty(&res)?);
            Ok(())
        }
        Command::HomeDir => {
            let bridge = connect(table);
            println!("{}", bridge.home_dir().await?.display());
            Ok(())
        }
    }
}

fn connect(table: ModuleTable) -> Bridge {
    let resolver = Resolver::new().with_module_table(Arc::new(table));
    Bridge::new(resolver.resolve())
}

fn handle_module(table: &ModuleTable, module: &str, action: ModuleAction) -> anyhow::Result<()> {
    match action {
        ModuleAction::Add { program, args } => {
            table.set(module, &ProcessBinding::new(program, args))?;
            println!("✓ {module} registered.");
        }
        ModuleAction::Remove => {
            table.remove(module)?;
            println!("✓ {module} removed.");
        }
        ModuleAction::Show => match table.get(module)? {
            Some(binding) => {
                println!("{} {}", binding.program().display(), binding.args().join(" "));
            }
            None => bail!("no module named {module}"),
        },
    }
    Ok(())
}
