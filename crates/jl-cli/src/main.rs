//! jetlabel CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use jl_label::OutputNaming;
use std::path::PathBuf;

mod config;
mod matrix;
mod split;

#[derive(Parser)]
#[command(name = "jetlabel")]
#[command(about = "jetlabel - jet label matrices and per-label archive splitting for YODA files")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build jet label confusion matrices and their LaTeX tables
    LabelMatrix {
        /// Input YODA archive
        input: PathBuf,

        /// Output YODA archive of matrices
        output: PathBuf,

        /// Output text file of LaTeX tables
        tables: PathBuf,

        /// Categories per matrix axis (overrides config `matrix.size`)
        #[arg(long)]
        size: Option<usize>,

        /// Keep source weights instead of normalizing to unit area
        #[arg(long)]
        no_normalize: bool,

        /// YAML/JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write one archive per flavour/algorithm label found in object paths
    Split {
        /// Input YODA archive
        input: PathBuf,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Output naming: `label` or `prefixed` (overrides config `split_naming`)
        #[arg(long)]
        naming: Option<OutputNaming>,

        /// YAML/JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render LaTeX tables from an archive written by `label-matrix`
    Tabulate {
        /// Input YODA archive of matrices
        input: PathBuf,

        /// Output text file of LaTeX tables
        tables: PathBuf,
    },

    /// Print the effective category table
    Categories {
        /// YAML/JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::LabelMatrix { input, output, tables, size, no_normalize, config } => {
            let mut cfg = config::load_config(config.as_deref())?;
            if let Some(n) = size {
                cfg.matrix.size = n;
            }
            if no_normalize {
                cfg.matrix.normalize = false;
            }
            let run = matrix::cmd_label_matrix(&input, &output, &tables, &cfg)?;
            eprintln!("Wrote {} ({} matrices, {} skipped)", output.display(), run.written, run.skipped);
            eprintln!("Wrote {}", tables.display());
            Ok(())
        }
        Commands::Split { input, out_dir, naming, config } => {
            let mut cfg = config::load_config(config.as_deref())?;
            if let Some(n) = naming {
                cfg.split_naming = n;
            }
            split::cmd_split(&input, &out_dir, cfg.split_naming, &cfg)
        }
        Commands::Tabulate { input, tables } => {
            let n = matrix::cmd_tabulate(&input, &tables)?;
            eprintln!("Wrote {} ({n} tables)", tables.display());
            Ok(())
        }
        Commands::Categories { config } => cmd_categories(config.as_deref()),
        Commands::Version => {
            println!("jetlabel {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn cmd_categories(config: Option<&std::path::Path>) -> Result<()> {
    let cfg = config::load_config(config)?;
    let table = cfg.category_table()?;
    for c in table.iter() {
        let codes: Vec<String> = c.codes.iter().map(i32::to_string).collect();
        let marker = if c.index < cfg.matrix.size { "" } else { "\t(outside matrix)" };
        println!("{}\t{}\t{}{marker}", c.index, c.label, codes.join(","));
    }
    Ok(())
}
