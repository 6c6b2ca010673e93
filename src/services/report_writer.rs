use std::{fs::File, io::Write, path::Path};

use anyhow::{Context, Result};

use crate::domain::job_record::JobRecord;

const HEADERS: [&str; 6] = [
    "Title",
    "Link",
    "Location",
    "Date Posted",
    "Company",
    "Description",
];
const LINK_LABEL: &str = "Open posting";

/// Write `records` as CSV, one row per record. Links become spreadsheet
/// `HYPERLINK` formulas so they show up as a clickable label.
pub fn write_report<W: Write>(records: &[JobRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(HEADERS)
        .context("Failed to write report header")?;
    for record in records {
        wtr.write_record([
            record.title.as_str(),
            hyperlink(&record.link).as_str(),
            record.location.as_str(),
            record.date_posted.as_str(),
            record.company.as_str(),
            record.description.as_str(),
        ])
        .context("Failed to write report row")?;
    }
    wtr.flush().context("Failed to flush report")?;

    Ok(())
}

pub fn write_report_file(records: &[JobRecord], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    write_report(records, file)?;
    log::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

fn hyperlink(link: &str) -> String {
    match link.is_empty() {
        true => String::new(),
        false => format!(
            "=HYPERLINK(\"{}\",\"{}\")",
            link.replace('"', "\"\""),
            LINK_LABEL
        ),
    }
}
