//! wrapgen CLI: generalize structural locator rules.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;
use serde::Serialize;

use wrapgen::cluster::ClusterSummary;
use wrapgen::config::InductionConfig;
use wrapgen::error::{PathResult, WrapError, WrapResult};
use wrapgen::generalize::generalize_all;
use wrapgen::induce::Inducer;
use wrapgen::path::PathExpr;
use wrapgen::rule::load_rules;

#[derive(Parser)]
#[command(name = "wrapgen", version, about = "Wrapper induction over path-expression rules")]
struct Cli {
    /// Induction config (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generalize two or more path expressions into one.
    Generalize {
        /// Path expressions, e.g. "/html/body/div[1]/a".
        #[arg(required = true, num_args = 1..)]
        paths: Vec<String>,
    },

    /// Print the tag sequence (shape) of a path expression.
    Shape {
        /// Path expression.
        path: String,
    },

    /// Cluster rules from a JSON file by structural shape.
    Cluster {
        /// JSON file: [{"subject": "...", "object": "..."}, ...]
        #[arg(long)]
        file: PathBuf,
    },

    /// Induce generalized rules from a JSON file.
    Induce {
        /// JSON file: [{"subject": "...", "object": "..."}, ...]
        #[arg(long)]
        file: PathBuf,

        /// Emit support weights with each generalized rule.
        #[arg(long)]
        weighted: bool,
    },

    /// Write the effective induction config (defaults unless --config is given) to TOML.
    Config {
        /// Output path.
        #[arg(long, default_value = "induce.toml")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(cli)?;
    Ok(())
}

/// Execute one subcommand. Library failures surface as [`WrapError`] so the
/// miette hook renders their codes and help text.
fn run(cli: Cli) -> WrapResult<()> {
    let config = match &cli.config {
        Some(path) => InductionConfig::load(path)?,
        None => InductionConfig::default(),
    };
    let inducer = Inducer::new(config);

    match cli.command {
        Commands::Generalize { paths } => {
            let parsed = paths
                .iter()
                .map(|p| PathExpr::parse(p))
                .collect::<PathResult<Vec<_>>>()?;
            println!("{}", generalize_all(&parsed)?);
        }

        Commands::Shape { path } => {
            let parsed = PathExpr::parse(&path)?;
            println!("{}", parsed.shape());
        }

        Commands::Cluster { file } => {
            let rules = load_rules(&file)?;
            let clusters = inducer.cluster(&rules)?;
            let summaries: Vec<ClusterSummary> = clusters.iter().map(|c| c.summary()).collect();
            println!("{}", to_json(&summaries)?);
        }

        Commands::Induce { file, weighted } => {
            let rules = load_rules(&file)?;
            let json = if weighted {
                to_json(&inducer.generalize_weighted(&rules)?)?
            } else {
                to_json(&inducer.generalize(&rules)?)?
            };
            println!("{json}");
        }

        Commands::Config { out } => {
            inducer.config().save(&out)?;
            println!("Wrote induction config to {}", out.display());
        }
    }

    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> WrapResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| WrapError::Serialization {
        message: e.to_string(),
    })
}
