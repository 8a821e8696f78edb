//! Extract command handler: unzip downloaded archives.

use tracing::warn;

use estat_dl_core::archive::extract_zip;

use crate::cli::ExtractArgs;

pub async fn run_extract_command(args: &ExtractArgs) -> anyhow::Result<()> {
    let mut files_written = 0usize;
    let mut failed = 0usize;

    for archive in &args.archives {
        let archive_path = archive.clone();
        let target_dir = args.target_dir.clone();

        // Zip extraction is synchronous IO; keep it off the async workers.
        let result =
            tokio::task::spawn_blocking(move || extract_zip(&archive_path, &target_dir)).await;

        match result {
            Ok(Ok(count)) => files_written += count,
            Ok(Err(e)) => {
                warn!(archive = %archive.display(), error = %e, "extraction failed");
                failed += 1;
            }
            Err(e) => {
                warn!(archive = %archive.display(), error = %e, "extraction task panicked");
                failed += 1;
            }
        }
    }

    println!(
        "Extracted {files_written} files from {} archives ({failed} failed).",
        args.archives.len()
    );
    Ok(())
}
