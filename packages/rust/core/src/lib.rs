//! Run orchestration for the prospect ranker.
//!
//! Ties the ranker and the report renderers into the end-to-end `rank`
//! workflow, and manages the dated results tree those runs produce.

pub mod assembler;
pub mod pipeline;
pub mod results;
