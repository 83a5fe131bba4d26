use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use walkthrough_core::{StepCatalog, StepTemplate};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the built-in catalog as TOML, to stdout or `--out`.
    ExportCatalog {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate a catalog file and list its steps.
    CheckCatalog { path: PathBuf },
    /// Print the visual template of every built-in step as JSON.
    Templates,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::ExportCatalog { out } => {
            let toml = StepCatalog::vision_transformer().to_toml_string()?;
            match out {
                Some(path) => {
                    fs::write(&path, toml)
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                    println!("wrote catalog to {}", path.display());
                }
                None => print!("{toml}"),
            }
        }
        Command::CheckCatalog { path } => {
            let catalog = StepCatalog::load(&path)?;
            for (index, step) in catalog.iter().enumerate() {
                let detail = if step.detail.is_some() { " +detail" } else { "" };
                println!("{:>2}. {}{detail}", index + 1, step.title);
            }
            println!("{} ok: {} steps", path.display(), catalog.len());
        }
        Command::Templates => {
            let catalog = StepCatalog::vision_transformer();
            for (index, step) in catalog.iter().enumerate() {
                let template = StepTemplate::for_index(index);
                println!(
                    "{index} {}: {}",
                    step.title,
                    serde_json::to_string(&template)?
                );
            }
        }
    }

    Ok(())
}
