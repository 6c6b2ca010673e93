use url::Url;

use crate::domain::{job_record::JobRecord, locator::Locator};

use super::{DriverError, PageDriver};

const MIN_CELLS: usize = 3;

pub struct Extractor {
    table: Locator,
    rows: Locator,
    cells: Locator,
    anchor: Locator,
}

impl Extractor {
    pub fn new(table_selector: &str, rows_selector: &str) -> Self {
        Extractor {
            table: Locator::css(table_selector),
            rows: Locator::css(rows_selector),
            cells: Locator::css("td"),
            anchor: Locator::css("a"),
        }
    }

    /// Rows of the first table matching the results table selector, header
    /// included. No table means no rows.
    pub async fn rows<D: PageDriver>(&self, driver: &D) -> Result<Vec<D::Element>, DriverError> {
        match driver.find(&self.table).await? {
            Some(table) => driver.find_all_in(&table, &self.rows).await,
            None => Ok(vec![]),
        }
    }

    /// Read every data row of the results table on the current page.
    ///
    /// The first row is the header. Rows with fewer than three cells are
    /// dropped; missing cell content falls back to sentinels. Only a failure
    /// to list the rows themselves is reported as an error.
    pub async fn extract<D: PageDriver>(&self, driver: &D) -> Result<Vec<JobRecord>, DriverError> {
        let rows = self.rows(driver).await?;
        let base_url = driver.current_url().await.ok();

        let mut records = vec![];
        for (i, row) in rows.iter().enumerate().skip(1) {
            let cells = match driver.find_all_in(row, &self.cells).await {
                Ok(cells) => cells,
                Err(e) => {
                    log::warn!("Could not read cells of row {}: {}", i, e);
                    continue;
                }
            };

            if cells.len() < MIN_CELLS {
                log::debug!("Skipping row {} with {} cells", i, cells.len());
                continue;
            }

            let (title, link) = self.read_title_and_link(driver, &cells[0]).await;
            let link = link.map(|href| resolve_link(base_url.as_deref(), &href));
            let location = read_text(driver, &cells[1]).await;
            let date_posted = read_text(driver, &cells[2]).await;

            records.push(JobRecord::new(title, link, location, date_posted));
        }

        log::info!(
            "Extracted {} records from {} table rows",
            records.len(),
            rows.len()
        );

        Ok(records)
    }

    async fn read_title_and_link<D: PageDriver>(
        &self,
        driver: &D,
        cell: &D::Element,
    ) -> (Option<String>, Option<String>) {
        match driver.find_in(cell, &self.anchor).await {
            Ok(Some(anchor)) => {
                let title = read_text(driver, &anchor).await;
                let href = driver
                    .attribute(&anchor, "href")
                    .await
                    .ok()
                    .flatten()
                    .filter(|h| !h.trim().is_empty());
                (title, href)
            }
            Ok(None) => (None, None),
            Err(e) => {
                log::debug!("Could not look up title anchor: {}", e);
                (None, None)
            }
        }
    }
}

async fn read_text<D: PageDriver>(driver: &D, element: &D::Element) -> Option<String> {
    driver.text(element).await.ok()
}

/// Make `href` absolute against the page it was found on. Anything that
/// cannot be resolved is kept as written.
pub fn resolve_link(base_url: Option<&str>, href: &str) -> String {
    let href = href.trim();
    if let Ok(absolute) = Url::parse(href) {
        return absolute.to_string();
    }

    base_url
        .and_then(|base| Url::parse(base).ok())
        .and_then(|base| base.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}
