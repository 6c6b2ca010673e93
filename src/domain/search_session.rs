use super::job_record::JobRecord;

/// Why the page loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    PageLimit,
    NoNextPage,
    NavigationFailed,
}

/// State of one run. Only the navigator mutates it.
#[derive(Debug)]
pub struct SearchSession {
    pub query: String,
    pub max_pages: u32,
    pub current_page: u32,
    pub pages_processed: u32,
    pub records: Vec<JobRecord>,
    pub stop_reason: Option<StopReason>,
}

impl SearchSession {
    pub fn new(query: &str, max_pages: u32) -> Self {
        SearchSession {
            query: query.to_string(),
            max_pages,
            current_page: 1,
            pages_processed: 0,
            records: vec![],
            stop_reason: None,
        }
    }

    pub fn push_page(&mut self, records: Vec<JobRecord>) {
        self.pages_processed += 1;
        self.records.extend(records);
    }

    pub fn stop(&mut self, reason: StopReason) {
        self.stop_reason = Some(reason);
    }

    pub fn into_records(self) -> Vec<JobRecord> {
        self.records
    }
}
