//! `agent-forge` - build AI agents from a conversation

mod console;
mod llm;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forge_catalog::ToolCatalog;
use forge_core::prelude::*;
use forge_core::{generation_events, Listing};
use forge_extract::PlanExtractor;
use forge_plan::AgentPlan;
use forge_synth::CodeSynthesizer;
use std::cell::RefCell;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Agent Forge - turn a description into a runnable agent
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the output directory
    #[arg(long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Describe an agent, answer questions, get code
    Interactive,

    /// Generate code from a plan JSON file
    Generate {
        /// Plan document
        #[arg(long, value_name = "FILE")]
        plan: PathBuf,

        /// Print the code instead of saving it
        #[arg(long)]
        no_save: bool,

        /// Print server-sent event frames
        #[arg(long)]
        stream: bool,
    },

    /// Extract and validate a plan from raw model output
    Extract {
        /// Input file (stdin when absent)
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// List generated agents, newest first
    List {
        /// Entries to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Entries to show
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Show the tool catalog
    Tools,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ForgeConfig> {
    let mut config = match &cli.config {
        Some(path) => ForgeConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ForgeConfig::default(),
    };
    if let Some(dir) = &cli.output_dir {
        config = config.with_output_dir(dir);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("warning: could not load .env: {err}");
        }
    }
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    match &cli.command {
        Commands::Interactive => interactive(&config),
        Commands::Generate {
            plan,
            no_save,
            stream,
        } => generate_from_file(&config, plan, !*no_save, *stream),
        Commands::Extract { input } => extract(input.as_deref()),
        Commands::List {
            offset,
            limit,
            json,
        } => list(&config, *offset, *limit, *json),
        Commands::Tools => {
            print!("{}", render_catalog(ToolCatalog::global()));
            Ok(())
        }
    }
}

fn interactive(config: &ForgeConfig) -> Result<()> {
    let client = llm::ChatClient::from_config(config)?;
    let store = FileStore::new(&config.output_dir);
    let observer = console::ConsoleObserver::new(io::stdout(), config.max_iterations);

    println!("Agent Forge - I will help you build a custom agent\n");
    let console = RefCell::new(console::Console::new(io::stdin().lock(), io::stdout()));
    let mut turns = console::SharedConsole(&console);
    let mut confirmer = console::SharedConsole(&console);

    let session = ForgeSession::new(config.clone(), &client, &client, &store).with_observer(&observer);
    match session.run(&mut turns, &mut confirmer) {
        Ok(_) => Ok(()),
        Err(err) if err.is_recoverable() => {
            tracing::warn!(kind = err.kind(), "session ended without an agent");
            eprintln!("error: {err}");
            Ok(())
        }
        Err(err) => Err(err).context("session failed"),
    }
}

fn generate_from_file(config: &ForgeConfig, plan_path: &Path, save: bool, stream: bool) -> Result<()> {
    let text = std::fs::read_to_string(plan_path)
        .with_context(|| format!("reading plan {}", plan_path.display()))?;
    let plan = AgentPlan::from_json_str(&text).context("invalid plan")?;

    let catalog = config.catalog();
    let synthesizer = CodeSynthesizer::with_catalog(&catalog).with_options(config.synthesis_options());
    let store = FileStore::new(&config.output_dir);
    let store_ref: Option<&dyn ArtifactStore> = if save { Some(&store) } else { None };

    if stream {
        for event in generation_events(&plan, &synthesizer, config.chunk_size, store_ref) {
            print!("{}", event.to_sse());
        }
        return Ok(());
    }

    let report = generate(&plan, &synthesizer, store_ref)?;
    match &report.filepath {
        Some(path) => println!(
            "Generated {} agent ({} lines): {}",
            report.variant,
            report.lines,
            path.display()
        ),
        None => print!("{}", report.code),
    }
    Ok(())
}

fn extract(input: Option<&Path>) -> Result<()> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };

    match PlanExtractor::new().extract(&raw) {
        Ok(plan) => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Err(err) => {
            for violation in err.violations() {
                eprintln!("  - {violation}");
            }
            eprintln!("candidate:\n{}", err.candidate());
            Err(err.into())
        }
    }
}

fn list(config: &ForgeConfig, offset: usize, limit: usize, json: bool) -> Result<()> {
    let listing = FileStore::new(&config.output_dir).list(offset, limit)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print!("{}", render_listing(&listing));
    }
    Ok(())
}

fn render_listing(listing: &Listing) -> String {
    let mut out = format!(
        "{} agent(s) in {}\n",
        listing.total,
        listing.output_dir.display()
    );
    for agent in &listing.agents {
        out.push_str(&format!(
            "{}  {}  {} lines  {}\n    {}\n",
            agent.modified_at.format("%Y-%m-%d %H:%M"),
            agent.filename,
            agent.lines,
            agent.summary.name,
            agent.summary.role
        ));
    }
    out
}

fn render_catalog(catalog: &ToolCatalog) -> String {
    let mut out = String::new();
    for entry in catalog.entries() {
        out.push_str(&format!(
            "{:<12} [{}] {}\n    aliases: {}\n",
            entry.name,
            entry.class,
            entry.description,
            entry.aliases.join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "agent-forge",
            "generate",
            "--plan",
            "plan.json",
            "--no-save",
            "--stream",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate {
                plan,
                no_save,
                stream,
            } => {
                assert_eq!(plan, PathBuf::from("plan.json"));
                assert!(no_save);
                assert!(stream);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn list_defaults() {
        let cli = Cli::try_parse_from(["agent-forge", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List {
                offset: 0,
                limit: 50,
                json: false
            }
        ));
    }

    #[test]
    fn output_dir_override() {
        let cli = Cli::try_parse_from(["agent-forge", "--output-dir", "out", "tools"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn catalog_listing_mentions_every_tool() {
        let text = render_catalog(ToolCatalog::global());
        for name in ["duckduckgo", "serper", "yfinance", "reasoning", "python", "file"] {
            assert!(text.contains(name), "{name}");
        }
    }
}
