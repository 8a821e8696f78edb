//! Download command handler: plan pages for every matching table and run
//! the bulk fetch engine over the resulting batch.

use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::{debug, info};

use estat_dl_core::api::{Operation, ResponseFormat, build_url, plan_pages};
use estat_dl_core::download::{
    BulkFetchEngine, HttpClient, TextFetcher, Transcoding, WorkBatch,
};
use estat_dl_core::progress::BatchProgress;
use estat_dl_core::{QueryParams, layout};

use super::{api_config_from, fetch_table_list};
use crate::cli::DownloadArgs;

pub async fn run_download_command(args: &DownloadArgs, quiet: bool) -> anyhow::Result<()> {
    let config = api_config_from(&args.api);
    let client = HttpClient::new();

    let Some(transcoding) = Transcoding::from_labels(&args.read_encoding, &args.write_encoding)
    else {
        bail!(
            "unknown encoding label: --read-encoding {} / --write-encoding {}",
            args.read_encoding,
            args.write_encoding
        );
    };

    // Startup failure here is fatal; per-page failures later are not.
    let (_, tables) = fetch_table_list(&client, &config, &args.filter).await?;
    if tables.is_empty() {
        println!("No tables matched.");
        return Ok(());
    }
    info!(tables = tables.len(), "listing matched tables");

    // Parallel source/destination lists, one entry per page of each table.
    let mut sources = Vec::new();
    let mut dests = Vec::new();
    for table in &tables {
        let pages = plan_pages(table.total_rows, args.page_size)?;
        let dir = layout::table_dir(&args.output_dir, &table.name, &table.id);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("cannot create {}", dir.display()))?;
        debug!(table = %table.id, pages = pages.len(), dir = %dir.display(), "planned table");

        for page in pages {
            let params = data_params(&config, &table.id).paged(&page);
            let url = build_url(&config, Operation::StatsData, ResponseFormat::Csv, &params)?;
            sources.push(url.to_string());
            dests.push(dir.join(layout::page_file_name(&table.name, &table.id, page.index)));
        }
    }

    let batch = WorkBatch::from_pairs(sources, dests)?;
    info!(pages = batch.len(), "batch planned");

    let engine = BulkFetchEngine::new(usize::from(args.concurrency))?;
    let fetcher = Arc::new(TextFetcher::new(client, transcoding));
    let total = batch.len() as u64;
    let progress = if args.no_progress || quiet {
        BatchProgress::hidden(total)
    } else {
        BatchProgress::new(total)
    };

    let stats = engine.run_batch(batch, fetcher, &progress).await?;

    println!(
        "Completed {} of {} pages ({} failed).",
        stats.completed(),
        stats.total(),
        stats.failed()
    );
    // Failed pages are reported but do not change the exit code; the
    // tuples give the operator what a re-run needs.
    for failure in stats.failures() {
        eprintln!(
            "failed: {} -> {}: {}",
            failure.source,
            failure.dest.display(),
            failure.reason
        );
    }

    Ok(())
}

/// Query parameters for one table's data pages: CSV rows only, headers and
/// annotation blocks suppressed.
fn data_params(config: &estat_dl_core::ApiConfig, table_id: &str) -> QueryParams {
    QueryParams::for_config(config)
        .with("statsDataId", table_id)
        .with("explanationGetFlg", "N")
        .with("annotationGetFlg", "N")
        .with("metaGetFlg", "N")
        .with("sectionHeaderFlg", "2")
}
