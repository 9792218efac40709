//! Core record types for schoolfinder.
//!
//! This module defines the school record as stored, the normalized record
//! accepted for insertion, the raw client submission, and the coordinate pair
//! used as a ranking reference point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, expected in [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, expected in [-180, 180].
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without checking bounds.
    ///
    /// Use [`crate::validate::validate_coordinate`] for untrusted input.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A school record as persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    /// Identifier assigned by the store.
    pub id: i64,

    /// Trimmed, non-empty school name.
    pub name: String,

    /// Trimmed, non-empty street address.
    pub address: String,

    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// When the store accepted this record.
    pub created_at: DateTime<Utc>,
}

impl School {
    /// The location of this school.
    #[must_use]
    pub const fn location(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A validated school that has not been persisted yet.
///
/// Only the validator builds these from client input, so every value reaching
/// the store already has trimmed text and in-range coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchool {
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) location: Coordinate,
}

impl NewSchool {
    /// The trimmed school name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The trimmed address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The validated location.
    #[must_use]
    pub const fn location(&self) -> Coordinate {
        self.location
    }
}

/// Raw write payload as submitted by a client.
///
/// Fields are kept loosely typed: coordinates may arrive as JSON numbers or as
/// numeric strings, and any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolSubmission {
    /// Submitted name.
    pub name: Option<Value>,
    /// Submitted address.
    pub address: Option<Value>,
    /// Submitted latitude (number or numeric string).
    pub latitude: Option<Value>,
    /// Submitted longitude (number or numeric string).
    pub longitude: Option<Value>,
}

impl SchoolSubmission {
    /// Build a submission from plain string fields, as the CLI receives them.
    #[must_use]
    pub fn from_strings(name: &str, address: &str, latitude: &str, longitude: &str) -> Self {
        Self {
            name: Some(Value::from(name)),
            address: Some(Value::from(address)),
            latitude: Some(Value::from(latitude)),
            longitude: Some(Value::from(longitude)),
        }
    }
}

/// A school annotated with its distance from a reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSchool {
    /// The stored record.
    #[serde(flatten)]
    pub school: School,

    /// Distance from the reference point in kilometers, rounded to 2 places.
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_school() -> School {
        School {
            id: 7,
            name: "ABC School".to_string(),
            address: "1 Main St".to_string(),
            latitude: 40.75,
            longitude: -73.98,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_school_location() {
        let school = sample_school();
        assert_eq!(school.location(), Coordinate::new(40.75, -73.98));
    }

    #[test]
    fn test_coordinate_display() {
        let coord = Coordinate::new(1.5, -2.25);
        assert_eq!(coord.to_string(), "(1.5, -2.25)");
    }

    #[test]
    fn test_submission_deserialize_mixed_types() {
        let json = r#"{"name": "X", "latitude": "12.5", "longitude": 3}"#;
        let submission: SchoolSubmission = serde_json::from_str(json).unwrap();

        assert_eq!(submission.name, Some(Value::from("X")));
        assert!(submission.address.is_none());
        assert_eq!(submission.latitude, Some(Value::from("12.5")));
        assert_eq!(submission.longitude, Some(Value::from(3)));
    }

    #[test]
    fn test_submission_from_strings() {
        let submission = SchoolSubmission::from_strings("a", "b", "1", "2");
        assert_eq!(submission.latitude, Some(Value::from("1")));
        assert_eq!(submission.longitude, Some(Value::from("2")));
    }

    #[test]
    fn test_ranked_school_serializes_flat() {
        let ranked = RankedSchool {
            school: sample_school(),
            distance: 1.08,
        };
        let json = serde_json::to_value(&ranked).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "ABC School");
        assert_eq!(json["distance"], 1.08);
        assert!(json.get("school").is_none());
        assert!(json.get("created_at").is_some());
    }
}
