use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

/// Thin command surface over the dataset catalog. Subcommands pick the
/// operation; argument values come from named environment variables so the
/// binary can be driven by tool runners that only pass an environment.
/// Stdout is reserved for the JSON result.
#[derive(Parser)]
#[command(name = "datasets")]
#[command(about = "File-backed dataset store over a workspace directory", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every dataset in the workspace
    #[command(name = "listDatasets")]
    ListDatasets,

    /// List element metadata in insertion order (env: DATASET_ID)
    #[command(name = "listElements")]
    ListElements,

    /// Print one element with its contents (env: DATASET_ID, ELEMENT)
    #[command(name = "getElement")]
    GetElement,

    /// Create an empty dataset (env: DATASET_NAME, DATASET_DESCRIPTION)
    #[command(name = "createDataset")]
    CreateDataset,

    /// Append one element (env: DATASET_ID, ELEMENT_NAME,
    /// ELEMENT_DESCRIPTION, ELEMENT_CONTENT)
    #[command(name = "addElement")]
    AddElement,

    /// Append a batch of elements (env: DATASET_ID, ELEMENTS; the payload
    /// may be a `{"_gz": ...}` gzip envelope)
    #[command(name = "addElements")]
    AddElements,

    /// Print every element with its contents (env: DATASET_ID)
    #[command(name = "getAllElements")]
    GetAllElements,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let catalog = commands::catalog_from_env()?;
    match cli.command {
        Commands::ListDatasets => commands::list_datasets(&catalog).await,
        Commands::ListElements => commands::list_elements(&catalog).await,
        Commands::GetElement => commands::get_element(&catalog).await,
        Commands::CreateDataset => commands::create_dataset(&catalog).await,
        Commands::AddElement => commands::add_element(&catalog).await,
        Commands::AddElements => commands::add_elements(&catalog).await,
        Commands::GetAllElements => commands::get_all_elements(&catalog).await,
    }
}
