//! Outreach text and report rendering for ranked prospects.
//!
//! Everything here returns strings; writing them to disk is the pipeline's
//! job.

pub mod csv;
pub mod markdown;
pub mod messages;

pub use csv::{CSV_HEADER, render_csv};
pub use markdown::{ReportMeta, render_markdown};
pub use messages::{CONNECTION_MESSAGE_LIMIT, connection_message, first_name, follow_up_message};
