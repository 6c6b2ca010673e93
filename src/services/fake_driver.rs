//! In-memory stand-in for a browser session, used by the navigator and
//! extractor tests.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;

use crate::domain::locator::Locator;

use super::{DriverError, PageDriver};

pub const TABLE: &str = "table";
pub const SITE_INPUT: &str = r#"input[name="keywords"]"#;
pub const GENERIC_INPUT: &str = r#"input[type="text"]"#;
const BASE_URL: &str = "https://jobs.example.com";

#[derive(Debug, Clone)]
pub struct FakeRow {
    cells: Vec<String>,
    href: Option<String>,
}

impl FakeRow {
    pub fn header() -> Self {
        FakeRow::cells(&["Title", "Location", "Posted"])
    }

    pub fn job(title: &str, href: &str, location: &str, date_posted: &str) -> Self {
        FakeRow {
            cells: vec![
                title.to_string(),
                location.to_string(),
                date_posted.to_string(),
            ],
            href: Some(href.to_string()),
        }
    }

    pub fn cells(cells: &[&str]) -> Self {
        FakeRow {
            cells: cells.iter().map(|c| c.to_string()).collect(),
            href: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeResults {
    rows: Vec<FakeRow>,
    next_text: Option<String>,
}

impl FakeResults {
    pub fn new(rows: Vec<FakeRow>, has_next: bool) -> Self {
        FakeResults {
            rows,
            next_text: has_next.then(|| "Next ›".to_string()),
        }
    }

    /// Render the pagination link with `text` instead of the usual label.
    pub fn with_next_text(mut self, text: &str) -> Self {
        self.next_text = Some(text.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Location {
    Blank,
    Entry,
    Results(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FakeElement {
    Document(u64),
    Input(String),
    Table { page: usize },
    Row { page: usize, row: usize },
    Cell { page: usize, row: usize, cell: usize },
    Anchor { page: usize, row: usize },
    Next { page: usize },
}

#[derive(Debug)]
struct FakeState {
    location: Location,
    generation: u64,
    typed: Vec<(String, String)>,
    screenshots: Vec<PathBuf>,
    clicks: usize,
    submitted_at: Option<tokio::time::Instant>,
}

pub struct FakePage {
    pages: Vec<FakeResults>,
    inputs: Vec<String>,
    entry_ready: bool,
    submit_navigates: bool,
    stalled_from: Option<usize>,
    dies_on: Option<usize>,
    next_lookup_fails: bool,
    rows_delay: Option<Duration>,
    state: Mutex<FakeState>,
}

impl FakePage {
    /// A browser already sitting on a single results page.
    pub fn single(rows: Vec<FakeRow>) -> Self {
        let page = FakePage::site(vec![FakeResults::new(rows, false)]);
        page.state.lock().unwrap().location = Location::Results(0);
        page
    }

    /// A site with an entry form leading to `pages` of results.
    pub fn site(pages: Vec<FakeResults>) -> Self {
        FakePage {
            pages,
            inputs: vec![GENERIC_INPUT.to_string()],
            entry_ready: true,
            submit_navigates: true,
            stalled_from: None,
            dies_on: None,
            next_lookup_fails: false,
            rows_delay: None,
            state: Mutex::new(FakeState {
                location: Location::Blank,
                generation: 0,
                typed: vec![],
                screenshots: vec![],
                clicks: 0,
                submitted_at: None,
            }),
        }
    }

    pub fn with_inputs(mut self, inputs: &[&str]) -> Self {
        self.inputs = inputs.iter().map(|i| i.to_string()).collect();
        self
    }

    pub fn entry_never_ready(mut self) -> Self {
        self.entry_ready = false;
        self
    }

    pub fn submit_renders_in_place(mut self) -> Self {
        self.submit_navigates = false;
        self
    }

    /// Clicking "Next" on results page `page` (zero based) never loads
    /// anything.
    pub fn next_stalls_on(mut self, page: usize) -> Self {
        self.stalled_from = Some(page);
        self
    }

    /// Listing rows on results page `page` fails as if the browser crashed.
    pub fn session_dies_on(mut self, page: usize) -> Self {
        self.dies_on = Some(page);
        self
    }

    /// Looking for the "Next" link fails as if the page changed under it.
    pub fn next_lookup_fails(mut self) -> Self {
        self.next_lookup_fails = true;
        self
    }

    /// Only the header row of the first results page is rendered until
    /// `delay` after the query was submitted.
    pub fn rows_render_after(mut self, delay: Duration) -> Self {
        self.rows_delay = Some(delay);
        self
    }

    pub fn typed(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().screenshots.clone()
    }

    pub fn clicks(&self) -> usize {
        self.state.lock().unwrap().clicks
    }

    fn location(&self) -> Location {
        self.state.lock().unwrap().location
    }

    fn navigate(&self, location: Location) {
        let mut state = self.state.lock().unwrap();
        state.location = location;
        state.generation += 1;
    }

    fn visible_rows(&self, page: usize) -> usize {
        let rows = self.pages[page].rows.len();
        let submitted_at = self.state.lock().unwrap().submitted_at;
        match (self.rows_delay, submitted_at) {
            (Some(delay), Some(at)) if page == 0 && at.elapsed() < delay => rows.min(1),
            _ => rows,
        }
    }

    fn row(&self, page: usize, row: usize) -> Result<&FakeRow, DriverError> {
        if self.location() != Location::Results(page) {
            return Err(DriverError::Session("stale element reference".to_string()));
        }
        self.pages
            .get(page)
            .and_then(|p| p.rows.get(row))
            .ok_or_else(|| DriverError::Session("no such row".to_string()))
    }
}

#[async_trait]
impl PageDriver for FakePage {
    type Element = FakeElement;

    async fn goto(&self, _url: &str) -> Result<(), DriverError> {
        self.navigate(Location::Entry);
        Ok(())
    }

    async fn ready_state(&self) -> Result<String, DriverError> {
        let state = match (self.location(), self.entry_ready) {
            (Location::Entry, false) => "loading",
            _ => "complete",
        };
        Ok(state.to_string())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(match self.location() {
            Location::Blank => "about:blank".to_string(),
            Location::Entry => format!("{}/search", BASE_URL),
            Location::Results(page) => format!("{}/search?page={}", BASE_URL, page + 1),
        })
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<FakeElement>, DriverError> {
        let location = self.location();
        let found = match (locator, location) {
            (Locator::Css(css), Location::Results(page)) if css == TABLE => {
                if self.dies_on == Some(page) {
                    return Err(DriverError::Session("chrome not reachable".to_string()));
                }
                match self.pages[page].rows.is_empty() {
                    true => vec![],
                    false => vec![FakeElement::Table { page }],
                }
            }
            (Locator::Css(css), Location::Entry) if self.inputs.contains(css) => {
                vec![FakeElement::Input(css.clone())]
            }
            (Locator::XPath(xpath), Location::Results(page)) => {
                if self.next_lookup_fails {
                    return Err(DriverError::Session("stale element reference".to_string()));
                }
                let rendered = self.pages[page].next_text.as_deref();
                match (searched_label(xpath), rendered) {
                    (Some(label), Some(text)) if text.contains(label) => {
                        vec![FakeElement::Next { page }]
                    }
                    _ => vec![],
                }
            }
            _ => vec![],
        };
        Ok(found)
    }

    async fn find_all_in(
        &self,
        parent: &FakeElement,
        locator: &Locator,
    ) -> Result<Vec<FakeElement>, DriverError> {
        let found = match (parent, locator) {
            (FakeElement::Table { page }, Locator::Css(_)) => {
                if self.location() != Location::Results(*page) {
                    return Err(DriverError::Session("stale element reference".to_string()));
                }
                (0..self.visible_rows(*page))
                    .map(|row| FakeElement::Row { page: *page, row })
                    .collect()
            }
            (FakeElement::Row { page, row }, Locator::Css(css)) if css == "td" => {
                let cells = self.row(*page, *row)?.cells.len();
                (0..cells)
                    .map(|cell| FakeElement::Cell {
                        page: *page,
                        row: *row,
                        cell,
                    })
                    .collect()
            }
            (FakeElement::Cell { page, row, cell: 0 }, Locator::Css(css)) if css == "a" => {
                match self.row(*page, *row)?.href {
                    Some(_) => vec![FakeElement::Anchor {
                        page: *page,
                        row: *row,
                    }],
                    None => vec![],
                }
            }
            _ => vec![],
        };
        Ok(found)
    }

    async fn text(&self, element: &FakeElement) -> Result<String, DriverError> {
        match element {
            FakeElement::Cell { page, row, cell } => Ok(self.row(*page, *row)?.cells[*cell].clone()),
            FakeElement::Anchor { page, row } => Ok(self.row(*page, *row)?.cells[0].clone()),
            FakeElement::Next { page } => {
                Ok(self.pages[*page].next_text.clone().unwrap_or_default())
            }
            _ => Ok(String::new()),
        }
    }

    async fn attribute(
        &self,
        element: &FakeElement,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        match (element, name) {
            (FakeElement::Anchor { page, row }, "href") => Ok(self.row(*page, *row)?.href.clone()),
            _ => Ok(None),
        }
    }

    async fn click(&self, element: &FakeElement) -> Result<(), DriverError> {
        self.state.lock().unwrap().clicks += 1;
        if let FakeElement::Next { page } = element {
            match self.stalled_from {
                Some(stalled) if stalled == *page => {}
                _ => self.navigate(Location::Results(page + 1)),
            }
        }
        Ok(())
    }

    async fn clear(&self, _element: &FakeElement) -> Result<(), DriverError> {
        Ok(())
    }

    async fn type_text(&self, element: &FakeElement, text: &str) -> Result<(), DriverError> {
        if let FakeElement::Input(css) = element {
            self.state
                .lock()
                .unwrap()
                .typed
                .push((css.clone(), text.to_string()));
        }
        Ok(())
    }

    async fn submit(&self, _element: &FakeElement) -> Result<(), DriverError> {
        self.state.lock().unwrap().submitted_at = Some(tokio::time::Instant::now());
        if self.submit_navigates {
            self.navigate(Location::Results(0));
        } else {
            self.state.lock().unwrap().location = Location::Results(0);
        }
        Ok(())
    }

    async fn document(&self) -> Result<FakeElement, DriverError> {
        Ok(FakeElement::Document(self.state.lock().unwrap().generation))
    }

    async fn is_stale(&self, element: &FakeElement) -> Result<bool, DriverError> {
        match element {
            FakeElement::Document(generation) => {
                Ok(*generation != self.state.lock().unwrap().generation)
            }
            _ => Ok(false),
        }
    }

    async fn screenshot(&self, path: &Path) -> Result<(), DriverError> {
        self.state
            .lock()
            .unwrap()
            .screenshots
            .push(path.to_path_buf());
        Ok(())
    }
}

/// The text a visible-text XPath looks for, i.e. the first quoted literal.
fn searched_label(xpath: &str) -> Option<&str> {
    let start = xpath.find('\'')? + 1;
    let len = xpath[start..].find('\'')?;
    Some(&xpath[start..start + len])
}
