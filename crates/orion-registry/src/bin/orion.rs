//! Command-line driver for the registration core
//!
//! Runs the same reconciliation workflow the portal UI drives, against
//! the configured endpoints.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use orion_domain::Publication;
use orion_registry::{
    CrossrefClient, PortalClient, PortalReconciler, ReconcilerState, RegistryConfig,
};

#[derive(Parser)]
#[command(name = "orion", about = "DOI resolution and publication registration")]
struct Cli {
    /// Path to a TOML config with endpoint overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a DOI: local duplicate check, then external resolution
    Verify { doi: String },
    /// Resolve a DOI against the external registry and print the mapped
    /// preview
    Resolve { doi: String },
    /// Register a publication from a JSON file
    Register { file: PathBuf },
    /// Browse the portal's own registry
    List {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };

    match cli.command {
        Command::Verify { doi } => verify(&config, &doi).await,
        Command::Resolve { doi } => resolve(&config, &doi).await,
        Command::Register { file } => register(&config, &file).await,
        Command::List { query, year } => list(&config, query, year).await,
    }
}

async fn verify(config: &RegistryConfig, doi: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut reconciler = PortalReconciler::from_config(config);

    match reconciler.verify(doi).await? {
        ReconcilerState::FoundLocal { existing } => {
            println!("Already registered: {}", existing.title);
            println!("  {}", existing.detail_path());
        }
        ReconcilerState::Mapped { mapped } => {
            print_mapped(&mapped.publication);
            if let Some(abstract_text) = &mapped.preview.abstract_text {
                println!("  abstract: {}", abstract_text);
            }
        }
        ReconcilerState::NotResolvable { doi } => {
            println!("Not resolvable: {} (manual entry required)", doi);
        }
        ReconcilerState::Failed { message, retryable } => {
            eprintln!("Failed: {}{}", message, if retryable { " (try again)" } else { "" });
        }
        other => println!("{:?}", other),
    }

    Ok(())
}

async fn resolve(config: &RegistryConfig, doi: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = CrossrefClient::new(config);
    let doi = orion_identifiers::normalize_doi(doi);

    match client.fetch_by_doi(&doi).await? {
        Some(work) => {
            let mapped = orion_registry::map_work(&work);
            print_mapped(&mapped.publication);
            for subject in &mapped.preview.subjects {
                println!("  subject: {}", subject);
            }
        }
        None => println!("Not resolvable: {}", doi),
    }

    Ok(())
}

async fn register(
    config: &RegistryConfig,
    file: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(file)?;
    let publication: Publication = serde_json::from_str(&raw)?;

    let mut reconciler = PortalReconciler::from_config(config);
    match reconciler.commit(publication).await? {
        ReconcilerState::Created { doi, target } => {
            println!("Registered {} -> {}", doi, target);
        }
        ReconcilerState::ConflictDetected {
            existing_doi,
            target,
            message,
        } => {
            println!("Already registered as {}: {}", existing_doi, message);
            println!("  {}", target);
        }
        ReconcilerState::Failed { message, .. } => eprintln!("Failed: {}", message),
        other => println!("{:?}", other),
    }

    Ok(())
}

async fn list(
    config: &RegistryConfig,
    query: Option<String>,
    year: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = PortalClient::new(config);
    let filters = orion_registry::PublicationQuery {
        query,
        year,
        ..Default::default()
    };

    for row in client.list(&filters).await? {
        println!(
            "{}  {}  ({})",
            row.doi,
            row.title,
            row.year.map_or("-".to_string(), |y| y.to_string())
        );
    }

    Ok(())
}

fn print_mapped(publication: &Publication) {
    println!("{}", publication.title);
    println!("  doi: {}", publication.doi);
    if let Some(journal) = &publication.journal {
        println!("  journal: {}", journal);
    }
    if let Some(year) = publication.year {
        println!("  year: {}", year);
    }
    for researcher in &publication.researchers {
        let orcid = if researcher.orcid_id.is_empty() {
            String::new()
        } else {
            format!(" [{}]", researcher.orcid_id)
        };
        println!("  author: {}{}", researcher.name, orcid);
    }
}
