pub mod job_record;
pub mod locator;
pub mod search_session;
