//! Snippet dispatch
//!
//! The [`Dispatcher`] threads one snippet through detection, the compiler
//! pipeline, the selected toolchain adapter and, when execution fails, the
//! recovery advisor. Each stage hands its result to the next explicitly;
//! nothing is kept between runs.

mod dispatcher;
mod error;
mod report;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use report::RunReport;
