//! osearch: OpenSearch command-line client
//!
//! Resolves a description document and runs searches against it.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use parliament_opensearch::{ClientConfig, SearchParameters, SearchRequest};

/// OpenSearch command-line client
#[derive(Parser)]
#[command(name = "osearch")]
#[command(version)]
#[command(about = "Query OpenSearch-described search APIs")]
struct Args {
    /// Description document URL
    #[arg(short, long, env = "OPENSEARCH_DESCRIPTION_URL")]
    description_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the URL templates advertised by the description
    Templates,

    /// Print the query URL for a search without sending it
    Url(SearchArgs),

    /// Run a search and print the results
    Search(SearchArgs),
}

#[derive(ClapArgs)]
struct SearchArgs {
    /// Search terms
    query: String,
    /// Response content type
    #[arg(short = 't', long = "type")]
    content_type: Option<String>,
    /// Results per page
    #[arg(long)]
    count: Option<u32>,
    /// Index of the first result
    #[arg(long)]
    start_index: Option<u32>,
    /// Page of results
    #[arg(long)]
    start_page: Option<u32>,
    /// Additional parameter as name=value (repeatable)
    #[arg(short, long = "param", value_parser = parse_key_value)]
    params: Vec<(String, String)>,
}

impl SearchArgs {
    fn parameters(&self) -> SearchParameters {
        let mut params = SearchParameters::new(&self.query);
        if let Some(count) = self.count {
            params = params.count(count);
        }
        if let Some(index) = self.start_index {
            params = params.start_index(index);
        }
        if let Some(page) = self.start_page {
            params = params.start_page(page);
        }
        for (name, value) in &self.params {
            params = params.param(name, value);
        }
        params
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    Ok((k.to_string(), v.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::from_env(),
    };

    let mut builder = SearchRequest::builder().config(config);
    if let Some(url) = args.description_url {
        builder = builder.description_url(url);
    }
    let request = builder.build().await?;

    match args.command {
        Command::Templates => {
            for entry in request.templates().iter() {
                println!("{}\t{}", entry.content_type(), entry.template());
            }
        }
        Command::Url(search) => {
            let url = request.query_url(&search.parameters(), search.content_type.as_deref())?;
            println!("{url}");
        }
        Command::Search(search) => {
            let feed = request
                .get(&search.parameters(), search.content_type.as_deref(), &[])
                .await?;
            if let Some(total) = &feed.total_results {
                println!("total results: {total}");
            }
            for entry in &feed.entries {
                println!("{}", entry.title.as_deref().unwrap_or("(untitled)"));
                if let Some(url) = &entry.url {
                    println!("  {url}");
                }
            }
        }
    }

    Ok(())
}
