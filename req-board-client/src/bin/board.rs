use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use req_board_client::board::Board;
use req_board_client::client::{HttpClient, RecordApi, DEFAULT_BASE_URL};
use req_board_client::controller::CrudController;
use req_board_core::record::CollectionName;
use req_board_core::schema::{FormValues, Schema};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "req-board-cli")]
#[command(about = "Manage actors, requirements and acceptance criteria on a req-board server")]
struct Cli {
    /// Server base URL
    #[arg(long, env = "REQ_BOARD_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every record of a collection as JSON
    List {
        #[arg(value_parser = parse_collection)]
        collection: CollectionName,
    },

    /// Create a record from field=value pairs
    Add {
        #[arg(value_parser = parse_collection)]
        collection: CollectionName,
        #[arg(value_parser = parse_pair)]
        fields: Vec<(String, String)>,
    },

    /// Change fields of a record; fields not given keep their values
    Update {
        #[arg(value_parser = parse_collection)]
        collection: CollectionName,
        id: String,
        #[arg(value_parser = parse_pair)]
        fields: Vec<(String, String)>,
    },

    /// Delete a record
    Delete {
        #[arg(value_parser = parse_collection)]
        collection: CollectionName,
        id: String,
    },

    /// Print the rendered CRUD page
    Page,
}

fn parse_collection(name: &str) -> Result<CollectionName, String> {
    CollectionName::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = CollectionName::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown collection {name:?}, expected one of {}", known.join(", "))
    })
}

fn parse_pair(pair: &str) -> Result<(String, String), String> {
    pair.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected field=value, got {pair:?}"))
}

fn controller(api: Arc<HttpClient>, collection: CollectionName) -> CrudController<HttpClient> {
    CrudController::new(api, collection, Schema::for_collection(collection))
}

fn check(controller: &CrudController<HttpClient>) -> Result<()> {
    match controller.last_error() {
        Some(err) => bail!("{err}"),
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = Arc::new(HttpClient::new(&cli.base_url)?);

    match cli.command {
        Commands::List { collection } => {
            let records = api.fetch(collection).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Add { collection, fields } => {
            let mut crud = controller(api, collection);
            crud.begin_create();
            crud.submit(&fields.into_iter().collect::<FormValues>()).await;
            check(&crud)?;
            print!("{}", crud.list_panel());
        }
        Commands::Update { collection, id, fields } => {
            let mut crud = controller(api, collection);
            crud.edit(&id).await;
            check(&crud)?;
            let mut values = crud.form_values().clone();
            values.extend(fields);
            crud.submit(&values).await;
            check(&crud)?;
            print!("{}", crud.list_panel());
        }
        Commands::Delete { collection, id } => {
            let mut crud = controller(api, collection);
            crud.delete(&id).await;
            check(&crud)?;
            print!("{}", crud.list_panel());
        }
        Commands::Page => {
            let board = Board::load(api).await;
            for collection in CollectionName::ALL {
                check(board.controller(collection))?;
            }
            print!("{}", board.render_page());
        }
    }
    Ok(())
}
