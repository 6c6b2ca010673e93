use std::{fs::File, io::Write, path::Path};

use anyhow::{Context, Result};

use crate::domain::job_record::JobRecord;

/// Dump the raw records as pretty JSON.
pub fn persist_backup<W: Write>(records: &[JobRecord], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records).context("Failed to serialize records")?;
    writer.flush().context("Failed to flush backup")?;
    Ok(())
}

pub fn persist_backup_file(records: &[JobRecord], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create backup {}", path.display()))?;
    persist_backup(records, file)?;
    log::info!("Backed up {} records to {}", records.len(), path.display());
    Ok(())
}
