use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use composers_graphql::schema::SDL;
use composers_graphql::Catalog;
use composers_graphql::ComposersService;
use composers_graphql::JsonMap;
use composers_graphql::Request;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let app = Cli::parse();
    app.run()
}

#[derive(Debug, Parser)]
#[command(
    name = "composers",
    version,
    about = "Run GraphQL documents against the composers catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Start from an empty catalog instead of the seed composers
    #[arg(long, global = true, env = "COMPOSERS_EMPTY_CATALOG")]
    empty_catalog: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the schema in GraphQL schema definition language
    Schema,
    /// Execute documents in order against one catalog, printing each response
    Execute(Execute),
}

#[derive(Debug, Args)]
struct Execute {
    /// Paths of `.graphql` documents
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// Variables as a JSON object, shared by every document
    #[arg(long, conflicts_with = "variables_file")]
    variables: Option<String>,

    /// Path of a file containing variables as a JSON object
    #[arg(long, env = "COMPOSERS_VARIABLES_FILE")]
    variables_file: Option<PathBuf>,

    /// Operation to execute when a document contains several
    #[arg(long)]
    operation_name: Option<String>,

    /// Print each response on a single line
    #[arg(long)]
    compact: bool,
}

impl Cli {
    fn run(&self) -> Result<()> {
        match &self.command {
            Command::Schema => {
                print!("{SDL}");
                Ok(())
            }
            Command::Execute(execute) => {
                let catalog = if self.empty_catalog {
                    Catalog::default()
                } else {
                    Catalog::seeded()
                };
                execute.run(ComposersService::new(catalog)?)
            }
        }
    }
}

impl Execute {
    fn run(&self, service: ComposersService) -> Result<()> {
        let variables = self.variables()?;
        for path in &self.documents {
            let query = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let mut request = Request::new(query).variables(variables.clone());
            if let Some(operation_name) = &self.operation_name {
                request = request.operation_name(operation_name);
            }
            tracing::info!(document = %path.display(), "executing");
            let response = service.execute(&request);
            let json = if self.compact {
                serde_json::to_string(&response)?
            } else {
                serde_json::to_string_pretty(&response)?
            };
            println!("{json}");
        }
        Ok(())
    }

    fn variables(&self) -> Result<JsonMap> {
        let source = match (&self.variables, &self.variables_file) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            (None, None) => return Ok(JsonMap::new()),
        };
        serde_json::from_str(&source).context("variables must be a JSON object")
    }
}
