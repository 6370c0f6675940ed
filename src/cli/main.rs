//! CLI binary entry point for warehouse-etl-cli
//!
//! Renders and checks the warehouse statement catalogs for an external
//! runner. The CLI never opens a warehouse connection; it produces files
//! and reports.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use warehouse_etl_sdk::config::{self, CONFIG_FILENAME};
use warehouse_etl_sdk::{EtlConfig, QueryCatalog, Statement};

#[derive(Parser)]
#[command(name = "warehouse-etl-cli")]
#[command(about = "Render and check star-schema warehouse statement catalogs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample dwh.toml into a workspace directory
    Init {
        /// Workspace directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Render the four statement catalogs as SQL
    Render {
        /// Workspace directory containing dwh.toml
        #[arg(short, long, default_value = ".")]
        config: PathBuf,
        /// Write one .sql file per catalog into this directory instead of stdout
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Print the catalog manifest (phase -> target tables)
    Manifest {
        /// Workspace directory containing dwh.toml
        #[arg(short, long, default_value = ".")]
        config: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ManifestFormat,
    },
    /// Build the catalog and run dependency and syntax checks
    Check {
        /// Workspace directory containing dwh.toml
        #[arg(short, long, default_value = ".")]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ManifestFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { dir } => handle_init(&dir),
        Commands::Render { config, out_dir } => handle_render(&config, out_dir.as_deref()),
        Commands::Manifest { config, format } => handle_manifest(&config, format),
        Commands::Check { config } => handle_check(&config),
    }
}

fn load_config(workspace: &std::path::Path) -> Result<EtlConfig> {
    EtlConfig::load(workspace)
        .with_context(|| format!("loading {} from {}", CONFIG_FILENAME, workspace.display()))
}

fn handle_init(dir: &std::path::Path) -> Result<()> {
    if EtlConfig::exists(dir) {
        bail!("{} already exists in {}", CONFIG_FILENAME, dir.display());
    }
    let path = dir.join(CONFIG_FILENAME);
    std::fs::write(&path, config::sample_config())
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn handle_render(workspace: &std::path::Path, out_dir: Option<&std::path::Path>) -> Result<()> {
    let config = load_config(workspace)?;
    let catalog = QueryCatalog::build(&config)?;

    let phases: [(&str, &[Statement]); 4] = [
        ("drop_tables", &catalog.drop_table_queries),
        ("create_tables", &catalog.create_table_queries),
        ("copy_tables", &catalog.copy_table_queries),
        ("insert_tables", &catalog.insert_table_queries),
    ];

    match out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
            for (index, (name, statements)) in phases.iter().enumerate() {
                let path = dir.join(format!("{:02}_{}.sql", index + 1, name));
                std::fs::write(&path, render_phase(name, statements))
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "rendered catalog");
            }
            println!("Rendered 4 catalogs into {}", dir.display());
        }
        None => {
            for (name, statements) in phases {
                print!("{}", render_phase(name, statements));
                println!();
            }
        }
    }
    Ok(())
}

fn render_phase(name: &str, statements: &[Statement]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "-- {} (generated by warehouse-etl-cli at {})\n\n",
        name,
        Utc::now().to_rfc3339()
    ));
    for stmt in statements {
        out.push_str(&format!("-- {}: {}\n{}\n\n", stmt.kind, stmt.table, stmt.sql));
    }
    out
}

fn handle_manifest(workspace: &std::path::Path, format: ManifestFormat) -> Result<()> {
    let config = load_config(workspace)?;
    let catalog = QueryCatalog::build(&config)?;
    let manifest = catalog.manifest();
    let rendered = match format {
        ManifestFormat::Json => manifest.to_json()?,
        ManifestFormat::Yaml => manifest.to_yaml()?,
    };
    println!("{}", rendered);
    Ok(())
}

fn handle_check(workspace: &std::path::Path) -> Result<()> {
    let config = load_config(workspace)?;
    let catalog = QueryCatalog::build(&config)?;
    catalog.check_syntax()?;
    println!(
        "Catalog OK: {} statements across 4 phases, dependency order verified",
        catalog.len()
    );
    Ok(())
}
