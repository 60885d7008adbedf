//! # fpmwatch-types
//!
//! Core types for fpmwatch: parsing the PHP-FPM status report and mapping
//! it to typed metric submissions.
//!
//! ## Design Goals
//!
//! - **Presence-preserving**: a field missing from the status text stays
//!   missing; it is never coerced to zero.
//! - **Late typing**: the snapshot stores raw strings; numeric and
//!   timestamp interpretation happens in the mapper so a single bad field
//!   degrades only its own metric.
//! - **Deterministic output**: submissions come out in a fixed group and
//!   label order, so publish batches are reproducible.
//! - **Optional serialization**: enable the `serde` feature to serialize
//!   snapshots and submissions.
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use fpmwatch_types::{map_snapshot, FpmStatus, MetricGroup};
//!
//! let status = FpmStatus::parse(
//!     "pool: www\n\
//!      start time: 23/Jun/2019:12:13:50 +0200\n\
//!      accepted conn: 37211\n\
//!      idle processes: 6\n\
//!      active processes: 1\n\
//!      total processes: 7\n\
//!      max active processes: 13\n\
//!      slow requests: 0\n",
//! );
//!
//! let outcome = map_snapshot(&status, Utc::now());
//! assert_eq!(outcome.submissions[0].group, MetricGroup::Processes);
//! assert_eq!(outcome.submissions[0].value_label, "idle");
//! ```

mod mapper;
mod status;
mod submission;

pub use mapper::*;
pub use status::*;
pub use submission::*;
