//! Search command handler: query the table listing and print matches.

use anyhow::Context;
use estat_dl_core::download::HttpClient;
use tracing::info;

use super::{api_config_from, fetch_table_list};
use crate::cli::SearchArgs;

pub async fn run_search_command(args: &SearchArgs) -> anyhow::Result<()> {
    let config = api_config_from(&args.api);
    let client = HttpClient::new();

    let (listing, tables) = fetch_table_list(&client, &config, &args.filter).await?;

    if let Some(path) = &args.save {
        let pretty = serde_json::to_string_pretty(&listing)?;
        tokio::fs::write(path, pretty)
            .await
            .with_context(|| format!("cannot write listing to {}", path.display()))?;
        info!(path = %path.display(), "saved raw listing response");
    }

    if tables.is_empty() {
        println!("No tables matched.");
        return Ok(());
    }

    println!("{:<12} {:>12}  {}", "ID", "ROWS", "NAME");
    for table in &tables {
        println!("{:<12} {:>12}  {}", table.id, table.total_rows, table.name);
    }
    println!("{} tables matched.", tables.len());

    Ok(())
}
