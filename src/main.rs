use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use cmake_tasks::{
    compdb::CompileCommandsSync, config::CONFIG_FILE, fileapi::FileApiClient, path,
    targets::TargetCatalog, BuildConfig, BuildType, Context, Notifier, Prompter, Step, Task,
    TaskBuilder,
};

/// Prints CMake/Conan task commands as JSON for a host to run
#[derive(Parser)]
#[command(name = "cmake-tasks")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
struct Cli {
    /// Config file (defaults to cmake-tasks.json in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured build type
    #[arg(short, long)]
    build_type: Option<String>,

    /// Override the configured target
    #[arg(short, long)]
    target: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the steps of a task
    Steps { task: Task },
    /// Print the command for one step
    Command { step: Step },
    /// List the targets of the configured build tree
    Targets,
    /// Link or copy compile_commands.json into the working directory
    SyncCompileCommands,
}

struct Terminal;

impl Notifier for Terminal {
    fn info(&self, message: &str) {
        eprintln!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

impl Prompter for Terminal {
    fn input(&self, prompt: &str) -> Option<String> {
        eprint!("{prompt}");
        io::stderr().flush().ok()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        Some(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn select(&self, prompt: &str, items: &[String]) -> Option<String> {
        eprintln!("{prompt}:");
        for (i, item) in items.iter().enumerate() {
            eprintln!("  {}) {item}", i + 1);
        }
        let choice: usize = self.input("> ")?.trim().parse().ok()?;
        items.get(choice.checked_sub(1)?).cloned()
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::current()?;
    let config = load_config(&cli, &ctx)?;

    match cli.command {
        Commands::Steps { task } => {
            println!("{}", serde_json::to_string(task.steps())?);
        }
        Commands::Command { step } => {
            let builder = TaskBuilder::new(&ctx, &Terminal, &Terminal);
            let Some(cmd) = builder.step(step, &config) else {
                return Ok(ExitCode::FAILURE);
            };
            println!("{}", serde_json::to_string_pretty(&cmd)?);
        }
        Commands::Targets => {
            let client = FileApiClient::default();
            let build_dir = path::resolve(&config.build_dir, config.build_type, &ctx);
            for name in TargetCatalog::new(&client).list_target_names(&build_dir)? {
                println!("{name}");
            }
        }
        Commands::SyncCompileCommands => {
            let build_dir = path::resolve(&config.build_dir, config.build_type, &ctx);
            CompileCommandsSync::new(&build_dir, &ctx).run()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(cli: &Cli, ctx: &Context) -> Result<BuildConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| ctx.cwd.join(CONFIG_FILE));
    let mut config = BuildConfig::load(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    if let Some(build_type) = &cli.build_type {
        config.build_type = build_type.parse::<BuildType>()?;
    }
    if let Some(target) = &cli.target {
        config.target = Some(target.clone());
    }
    Ok(config)
}
