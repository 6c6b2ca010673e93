use std::{path::PathBuf, time::Duration};

use crate::{
    configuration::{SiteSettings, TimeoutSettings},
    domain::{
        job_record::JobRecord,
        locator::Locator,
        search_session::{SearchSession, StopReason},
    },
};

use super::{await_navigation, await_ready, DriverError, Extractor, NavigationOutcome, PageDriver};

#[derive(Debug, thiserror::Error)]
pub enum NavigatorError {
    #[error("entry page {url} did not become interactive")]
    EntryLoad { url: String },

    #[error("no query input found on the entry page (tried {tried} locators)")]
    NoQueryInput { tried: usize },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

pub struct Navigator<'a, D: PageDriver> {
    driver: &'a D,
    extractor: Extractor,
    entry_url: String,
    query_inputs: Vec<Locator>,
    next_page: Locator,
    page_load_timeout: Duration,
    navigation_timeout: Duration,
    settle_timeout: Duration,
    poll: Duration,
    snapshot_path: Option<PathBuf>,
}

impl<'a, D: PageDriver> Navigator<'a, D> {
    pub fn new(driver: &'a D, site: &SiteSettings, timeouts: &TimeoutSettings) -> Self {
        Navigator {
            driver,
            extractor: Extractor::new(&site.results_table, &site.results_rows),
            entry_url: site.entry_url.clone(),
            query_inputs: site.query_inputs.iter().map(|s| Locator::css(s)).collect(),
            next_page: Locator::by_visible_text(&site.next_label),
            page_load_timeout: timeouts.page_load(),
            navigation_timeout: timeouts.navigation(),
            settle_timeout: timeouts.settle(),
            poll: timeouts.poll(),
            snapshot_path: None,
        }
    }

    /// Where to save a screenshot of the entry page before it is touched.
    pub fn with_snapshot(mut self, path: PathBuf) -> Self {
        self.snapshot_path = Some(path);
        self
    }

    /// Search for `query` and collect listings from at most `max_pages`
    /// result pages. Never fails: a run that cannot get going, or whose
    /// browser session breaks, yields no records.
    pub async fn run(&self, query: &str, max_pages: u32) -> Vec<JobRecord> {
        match self.search(query, max_pages).await {
            Ok(session) => session.into_records(),
            Err(e) => {
                log::error!("Search for {:?} failed: {}", query, e);
                vec![]
            }
        }
    }

    pub async fn search(&self, query: &str, max_pages: u32) -> Result<SearchSession, NavigatorError> {
        let mut session = SearchSession::new(query, max_pages);

        self.open_entry_page().await?;
        self.take_snapshot().await;
        self.submit_query(query).await?;
        self.settle().await;

        while session.current_page <= session.max_pages {
            log::info!(
                "Extracting page {}/{} for {:?}",
                session.current_page,
                session.max_pages,
                session.query
            );
            let records = self.extractor.extract(self.driver).await?;
            session.push_page(records);

            if session.current_page == session.max_pages {
                session.stop(StopReason::PageLimit);
                break;
            }

            let next = match self.driver.find(&self.next_page).await {
                Ok(Some(next)) => next,
                Ok(None) => {
                    log::info!("No next page after page {}", session.current_page);
                    session.stop(StopReason::NoNextPage);
                    break;
                }
                Err(e) => {
                    log::warn!(
                        "Looking for the next page after page {} failed: {}",
                        session.current_page,
                        e
                    );
                    session.stop(StopReason::NavigationFailed);
                    break;
                }
            };

            match self.follow(&next).await {
                NavigationOutcome::Navigated => {}
                NavigationOutcome::TimedOut => {
                    log::warn!(
                        "Timed out moving to page {}, keeping what we have",
                        session.current_page + 1
                    );
                    session.stop(StopReason::NavigationFailed);
                    break;
                }
                NavigationOutcome::Failed(e) => {
                    log::warn!(
                        "Navigation to page {} failed: {}",
                        session.current_page + 1,
                        e
                    );
                    session.stop(StopReason::NavigationFailed);
                    break;
                }
            }

            session.current_page += 1;
        }

        log::info!(
            "Collected {} records from {} pages ({:?})",
            session.records.len(),
            session.pages_processed,
            session.stop_reason
        );

        Ok(session)
    }

    /// Click `next` and wait for the following page to load.
    async fn follow(&self, next: &D::Element) -> NavigationOutcome {
        let marker = match self.driver.document().await {
            Ok(marker) => marker,
            Err(e) => return NavigationOutcome::Failed(e),
        };
        if let Err(e) = self.driver.click(next).await {
            return NavigationOutcome::Failed(e);
        }
        await_navigation(self.driver, &marker, self.navigation_timeout, self.poll).await
    }

    async fn open_entry_page(&self) -> Result<(), NavigatorError> {
        log::info!("Opening {}", self.entry_url);

        let load = async {
            self.driver.goto(&self.entry_url).await?;
            Ok::<NavigationOutcome, DriverError>(
                await_ready(self.driver, self.page_load_timeout, self.poll).await,
            )
        };

        let outcome = match tokio::time::timeout(self.page_load_timeout, load).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => NavigationOutcome::Failed(e),
            Err(_) => NavigationOutcome::TimedOut,
        };

        match outcome {
            NavigationOutcome::Navigated => Ok(()),
            NavigationOutcome::TimedOut => Err(NavigatorError::EntryLoad {
                url: self.entry_url.clone(),
            }),
            NavigationOutcome::Failed(e) => {
                log::error!("Loading {} failed: {}", self.entry_url, e);
                Err(NavigatorError::EntryLoad {
                    url: self.entry_url.clone(),
                })
            }
        }
    }

    async fn take_snapshot(&self) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        match self.driver.screenshot(path).await {
            Ok(()) => log::info!("Saved entry page snapshot to {}", path.display()),
            Err(e) => log::warn!("Could not save snapshot to {}: {}", path.display(), e),
        }
    }

    async fn find_query_input(&self) -> Result<D::Element, NavigatorError> {
        for locator in self.query_inputs.iter() {
            if let Some(input) = self.driver.find(locator).await? {
                log::info!("Using query input {}", locator);
                return Ok(input);
            }
        }

        Err(NavigatorError::NoQueryInput {
            tried: self.query_inputs.len(),
        })
    }

    async fn submit_query(&self, query: &str) -> Result<(), NavigatorError> {
        let input = self.find_query_input().await?;

        self.driver.clear(&input).await?;
        self.driver.type_text(&input, query).await?;

        let marker = self.driver.document().await?;
        self.driver.submit(&input).await?;

        match await_navigation(self.driver, &marker, self.navigation_timeout, self.poll).await {
            NavigationOutcome::Navigated => {}
            NavigationOutcome::TimedOut => {
                log::warn!("No navigation after submitting, assuming results render in place")
            }
            NavigationOutcome::Failed(e) => {
                log::warn!(
                    "Waiting for navigation after submit failed: {}, assuming results render in place",
                    e
                )
            }
        }

        Ok(())
    }

    /// Give the results table a bounded chance to show a data row.
    async fn settle(&self) {
        let rows_rendered = async {
            loop {
                match self.extractor.rows(self.driver).await {
                    Ok(rows) if rows.len() > 1 => return,
                    _ => tokio::time::sleep(self.poll).await,
                }
            }
        };

        if tokio::time::timeout(self.settle_timeout, rows_rendered)
            .await
            .is_err()
        {
            log::warn!(
                "No result rows after {:?}, extracting anyway",
                self.settle_timeout
            );
        }
    }
}
