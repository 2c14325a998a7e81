// Clinic Back Office
// Author: Gabriel Demetrios Lafis

//! # Clinic Back Office
//!
//! Back office for a healthcare operation: patients, specialists,
//! appointments and lifeguards, with paginated listings and
//! time-bucketed analytics for an admin dashboard.
//!
//! ## Features
//!
//! - Windowed analytics bucketed by day, week, month or year, under one
//!   or several filters computed concurrently
//! - Paginated listings with relevance-ranked text search
//! - Async record store seam with an in-memory backend
//! - REST API for the dashboard
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use clinic_backoffice::{
//!     analytics::{resolve_window, DateWindow, Interval},
//!     query::{PageResult, Window},
//! };
//!
//! let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
//!
//! // Weekly analytics look back three months unless told otherwise
//! let window = resolve_window(&Interval::from("week"), None, None, now);
//! assert_eq!(
//!     window,
//!     DateWindow::Bounded {
//!         start: Utc.with_ymd_and_hms(2023, 12, 15, 12, 0, 0).unwrap(),
//!         end: now,
//!     }
//! );
//!
//! // Page 2 of 10 skips the first ten records
//! let page = Window::resolve(2, Some(10), 10);
//! assert_eq!(page.offset, 10);
//!
//! let result: PageResult<u32> = PageResult::new((11..=20).collect(), 2, 10, 23);
//! assert_eq!(result.total_pages, 3);
//! ```

pub mod data;
pub mod storage;
pub mod analytics;
pub mod query;
pub mod services;
pub mod api;
pub mod utils;

// Re-export main types
pub use data::{Predicate, Record, Value};
pub use analytics::{Aggregator, FilterSelection, Interval};
pub use query::{PageRequest, PageResult, QueryService};
pub use storage::{Collections, MemoryStore, RecordStore};
pub use services::Services;
pub use api::Server;
pub use utils::Config;
