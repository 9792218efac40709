//! The two use cases of the service: adding a school and listing schools by
//! proximity.
//!
//! Both take the store explicitly, so the HTTP handlers and the CLI share one
//! code path and tests can run against an in-memory store.

use tracing::{debug, info};

use crate::error::Result;
use crate::proximity::rank_by_proximity;
use crate::school::{RankedSchool, SchoolSubmission};
use crate::storage::SchoolStore;
use crate::validate::{validate_coordinate, validate_new_school};

/// Validate a submission and persist it.
///
/// Returns the identifier assigned by the store.
///
/// # Errors
///
/// Returns [`crate::Error::Validation`] for rejected input, or a storage error
/// if the insert fails. Nothing is written when validation fails.
pub fn add_school<S: SchoolStore + ?Sized>(store: &S, submission: &SchoolSubmission) -> Result<i64> {
    let school = validate_new_school(submission).inspect_err(|err| {
        debug!(field = %err.field, reason = err.reason, "Rejected school submission");
    })?;

    let id = store.insert(&school)?;
    info!(id, name = %school.name(), "Added school");
    Ok(id)
}

/// Rank every stored school by distance from the given reference point.
///
/// `latitude` and `longitude` are the raw query values.
///
/// # Errors
///
/// Returns [`crate::Error::Validation`] for an invalid reference point, or a
/// storage error if the records cannot be read. The store is not queried when
/// validation fails.
pub fn list_schools<S: SchoolStore + ?Sized>(
    store: &S,
    latitude: Option<&str>,
    longitude: Option<&str>,
) -> Result<Vec<RankedSchool>> {
    let reference = validate_coordinate(latitude, longitude).inspect_err(|err| {
        debug!(field = %err.field, reason = err.reason, "Rejected proximity query");
    })?;

    let schools = store.fetch_all()?;
    let ranked = rank_by_proximity(&schools, reference);
    debug!(%reference, count = ranked.len(), "Ranked schools");
    Ok(ranked)
}
