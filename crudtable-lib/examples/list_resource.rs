//! Lists the first page of a resource.
//!
//! Reads settings from the environment (or a `.env` file):
//!
//! ```env
//! CRUDTABLE_URL=http://localhost:8080
//! CRUDTABLE_RESOURCE=contacts
//! ```
//!
//! Then run: `cargo run -p crudtable-lib --example list_resource`

use std::env;

use crudtable_lib::CrudClient;
use crudtable_lib::api::ResourceApi;
use crudtable_lib::api::query::QueryState;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let url = env::var("CRUDTABLE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let resource = env::var("CRUDTABLE_RESOURCE").unwrap_or_else(|_| "contacts".to_string());

    let client = CrudClient::builder().url(url).build()?;
    let info = client.info(&resource).await?;
    let page = client.list(&resource, &QueryState::default()).await?;

    println!("{} ({} records)", page.list_title.as_deref().unwrap_or(&resource), page.count);
    println!("filterable: {:?}", info.filters.keys().collect::<Vec<_>>());
    for (id, row) in page.iter() {
        let cells: Vec<String> = page.list_columns.iter().map(|c| row.display(c)).collect();
        println!("{id}: {}", cells.join(" | "));
    }
    Ok(())
}
