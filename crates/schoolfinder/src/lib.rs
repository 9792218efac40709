//! `schoolfinder` - register schools and list them nearest first
//!
//! Submissions are validated, stored in `SQLite`, and ranked by great-circle
//! distance from a reference point on request. The validator and ranker are
//! pure; storage is injected through [`SchoolStore`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod proximity;
pub mod school;
pub mod server;
pub mod service;
pub mod storage;
pub mod validate;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use proximity::{distance_km, rank_by_proximity};
pub use school::{Coordinate, NewSchool, RankedSchool, School, SchoolSubmission};
pub use storage::{SchoolStore, Storage, StorageStats};
pub use validate::{validate_coordinate, validate_new_school, Field, ValidationError};
