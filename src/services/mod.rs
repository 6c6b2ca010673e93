pub mod data_persistance;
pub mod droid;
pub mod extractor;
pub mod navigator;
pub mod page_driver;
pub mod report_writer;

#[cfg(test)]
pub(crate) mod fake_driver;

pub use data_persistance::*;
pub use droid::*;
pub use extractor::*;
pub use navigator::*;
pub use page_driver::*;
pub use report_writer::*;
