//! Loads a resource into a table controller and prints the rendered HTML.
//!
//! Reads settings from the environment (or a `.env` file):
//!
//! ```env
//! CRUDTABLE_URL=http://localhost:8080
//! CRUDTABLE_RESOURCE=contacts
//! CRUDTABLE_LOCALE={"locale":"pt_BR","picker_format":"DD/MM/YYYY"}
//! ```
//!
//! Then run: `cargo run -p crudtable --example render_table`

use std::env;
use std::sync::Arc;

use crudtable::LocaleConfig;
use crudtable::TableConfig;
use crudtable::TableController;
use crudtable_dom::to_html;
use crudtable_lib::CrudClient;
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
    let locale = match env::var("CRUDTABLE_LOCALE") {
        Ok(json) => LocaleConfig::from_json(&json)?,
        Err(_) => LocaleConfig::default(),
    };

    let client = Arc::new(CrudClient::builder().url(url).build()?);
    let mut table = TableController::with_config(client, resource, TableConfig::default(), locale);
    table.load().await;

    println!("{}", to_html(&table.render()));
    for notice in table.state().notices.iter() {
        eprintln!("{:?}: {}", notice.level, notice.message);
    }
    Ok(())
}
