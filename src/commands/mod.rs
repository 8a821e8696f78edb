//! CLI command handlers.

mod download;
mod extract;
mod search;

pub use download::run_download_command;
pub use extract::run_extract_command;
pub use search::run_search_command;

use estat_dl_core::api::{ApiConfig, QueryParams};
use estat_dl_core::download::HttpClient;
use estat_dl_core::{Operation, ResponseFormat, TableInfo, build_url, parse_table_list};

use crate::cli::{ApiArgs, FilterArgs};

/// Builds the API configuration from shared CLI arguments.
fn api_config_from(args: &ApiArgs) -> ApiConfig {
    let mut config = ApiConfig::new(&args.app_id).with_lang(&args.lang);
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url);
    }
    config
}

/// Builds the listing query from the shared filter arguments.
fn listing_params(config: &ApiConfig, filter: &FilterArgs) -> QueryParams {
    let mut params = QueryParams::for_config(config).with("explanationGetFlg", "N");
    if let Some(stats_code) = &filter.stats_code {
        params.set("statsCode", stats_code);
    }
    if let Some(search_word) = &filter.search_word {
        params.set("searchWord", search_word);
    }
    if let Some(survey_years) = &filter.survey_years {
        params.set("surveyYears", survey_years);
    }
    if let Some(limit) = filter.limit {
        params.set("limit", limit.to_string());
    }
    params
}

/// Queries the table listing and returns the raw response alongside the
/// parsed tables.
///
/// Failure here is fatal to the invoking command: without the listing
/// there is no batch to build.
async fn fetch_table_list(
    client: &HttpClient,
    config: &ApiConfig,
    filter: &FilterArgs,
) -> anyhow::Result<(serde_json::Value, Vec<TableInfo>)> {
    let params = listing_params(config, filter);
    let url = build_url(config, Operation::StatsList, ResponseFormat::Json, &params)?;
    let listing = client.get_json(url.as_str()).await?;
    let tables = parse_table_list(&listing)?;
    Ok((listing, tables))
}
