use std::fs;

use anyhow::{Context, Result};

use crate::{
    configuration::{OutputSettings, Settings},
    domain::job_record::JobRecord,
    services::{persist_backup_file, write_report_file, Droid, Navigator},
};

/// One complete run: browse, tear the session down, write the artifacts.
///
/// The browser is shut down and both artifacts are written on every path,
/// even when no records could be collected.
pub async fn run(settings: &Settings, query: &str, max_pages: u32) -> Result<Vec<JobRecord>> {
    let output = &settings.output;
    fs::create_dir_all(&output.directory).with_context(|| {
        format!(
            "Failed to create output directory {}",
            output.directory.display()
        )
    })?;

    let (records, session_error) = match Droid::new(&settings.webdriver).await {
        Ok(droid) => {
            let navigator = Navigator::new(&droid, &settings.site, &settings.timeouts)
                .with_snapshot(output.snapshot_path());
            let records = navigator.run(query, max_pages).await;

            if let Err(e) = droid.quit().await {
                log::warn!("Browser did not shut down cleanly: {}", e);
            }
            (records, None)
        }
        Err(e) => {
            log::error!("Could not start a browser session: {}", e);
            (vec![], Some(e))
        }
    };

    write_artifacts(&records, output)?;

    match session_error {
        Some(e) => Err(e).context("Browser session unavailable"),
        None => Ok(records),
    }
}

/// Write the report and the backup. A failure in one does not stop the
/// other; the first error is returned.
pub fn write_artifacts(records: &[JobRecord], output: &OutputSettings) -> Result<()> {
    let report = write_report_file(records, &output.report_path());
    if let Err(e) = &report {
        log::error!("Could not write report: {:#}", e);
    }
    let backup = persist_backup_file(records, &output.backup_path());
    if let Err(e) = &backup {
        log::error!("Could not write backup: {:#}", e);
    }

    report.and(backup)
}
