//! Input validation for school submissions and ranking queries.
//!
//! Validation runs before anything reaches the store or the ranker. Each check
//! produces a [`ValidationError`] naming the offending field and a fixed,
//! client-facing reason, so identical input always yields an identical
//! rejection.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::school::{Coordinate, NewSchool, SchoolSubmission};

/// Inclusive latitude bound in degrees.
pub const MAX_LATITUDE: f64 = 90.0;

/// Inclusive longitude bound in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

const REASON_MISSING_FIELDS: &str = "All fields are required: name, address, latitude, longitude";
const REASON_INVALID_NAME: &str = "Name must be a non-empty string";
const REASON_INVALID_ADDRESS: &str = "Address must be a non-empty string";
const REASON_INVALID_LATITUDE: &str = "Latitude must be a number between -90 and 90";
const REASON_INVALID_LONGITUDE: &str = "Longitude must be a number between -180 and 180";
const REASON_MISSING_COORDINATES: &str = "Latitude and longitude are required";

/// The input field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// One or more required submission fields were absent.
    MissingFields,
    /// The school name.
    Name,
    /// The school address.
    Address,
    /// A latitude value.
    Latitude,
    /// A longitude value.
    Longitude,
    /// Both reference coordinates were absent.
    Coordinates,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "missing_fields"),
            Self::Name => write!(f, "name"),
            Self::Address => write!(f, "address"),
            Self::Latitude => write!(f, "latitude"),
            Self::Longitude => write!(f, "longitude"),
            Self::Coordinates => write!(f, "coordinates"),
        }
    }
}

/// A rejected submission or query.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{reason}")]
pub struct ValidationError {
    /// Which field failed.
    pub field: Field,
    /// Client-facing explanation.
    pub reason: &'static str,
}

impl ValidationError {
    const fn new(field: Field, reason: &'static str) -> Self {
        Self { field, reason }
    }

    /// Required submission fields were absent.
    #[must_use]
    pub const fn missing_fields() -> Self {
        Self::new(Field::MissingFields, REASON_MISSING_FIELDS)
    }

    /// The name was not a non-empty string.
    #[must_use]
    pub const fn invalid_name() -> Self {
        Self::new(Field::Name, REASON_INVALID_NAME)
    }

    /// The address was not a non-empty string.
    #[must_use]
    pub const fn invalid_address() -> Self {
        Self::new(Field::Address, REASON_INVALID_ADDRESS)
    }

    /// The latitude was missing, non-numeric, non-finite, or out of range.
    #[must_use]
    pub const fn invalid_latitude() -> Self {
        Self::new(Field::Latitude, REASON_INVALID_LATITUDE)
    }

    /// The longitude was missing, non-numeric, non-finite, or out of range.
    #[must_use]
    pub const fn invalid_longitude() -> Self {
        Self::new(Field::Longitude, REASON_INVALID_LONGITUDE)
    }

    /// Neither reference coordinate was supplied.
    #[must_use]
    pub const fn missing_coordinates() -> Self {
        Self::new(Field::Coordinates, REASON_MISSING_COORDINATES)
    }
}

/// Validate a raw submission and normalize it for storage.
///
/// Checks run in a fixed order and stop at the first failure: presence of all
/// four fields, name, address, latitude, longitude.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the first constraint that failed.
pub fn validate_new_school(
    submission: &SchoolSubmission,
) -> Result<NewSchool, ValidationError> {
    let (Some(name), Some(address), Some(latitude), Some(longitude)) = (
        present(submission.name.as_ref()),
        present(submission.address.as_ref()),
        present(submission.latitude.as_ref()),
        present(submission.longitude.as_ref()),
    ) else {
        return Err(ValidationError::missing_fields());
    };

    let name = non_empty_text(name).ok_or_else(ValidationError::invalid_name)?;
    let address = non_empty_text(address).ok_or_else(ValidationError::invalid_address)?;
    let latitude = value_to_number(latitude)
        .and_then(check_latitude)
        .ok_or_else(ValidationError::invalid_latitude)?;
    let longitude = value_to_number(longitude)
        .and_then(check_longitude)
        .ok_or_else(ValidationError::invalid_longitude)?;

    Ok(NewSchool {
        name,
        address,
        location: Coordinate::new(latitude, longitude),
    })
}

/// Validate a ranking reference point given as query-string text.
///
/// # Errors
///
/// Returns a "both missing" error when neither value is supplied, otherwise a
/// latitude- or longitude-specific error for the first value that fails.
pub fn validate_coordinate(
    latitude: Option<&str>,
    longitude: Option<&str>,
) -> Result<Coordinate, ValidationError> {
    if latitude.is_none() && longitude.is_none() {
        return Err(ValidationError::missing_coordinates());
    }

    let latitude = latitude
        .ok_or_else(ValidationError::invalid_latitude)
        .and_then(parse_latitude)?;
    let longitude = longitude
        .ok_or_else(ValidationError::invalid_longitude)
        .and_then(parse_longitude)?;

    Ok(Coordinate::new(latitude, longitude))
}

/// Parse latitude text into degrees within [-90, 90].
///
/// # Errors
///
/// Returns a latitude error for non-numeric, non-finite or out-of-range text.
pub fn parse_latitude(text: &str) -> Result<f64, ValidationError> {
    parse_number(text)
        .and_then(check_latitude)
        .ok_or_else(ValidationError::invalid_latitude)
}

/// Parse longitude text into degrees within [-180, 180].
///
/// # Errors
///
/// Returns a longitude error for non-numeric, non-finite or out-of-range text.
pub fn parse_longitude(text: &str) -> Result<f64, ValidationError> {
    parse_number(text)
        .and_then(check_longitude)
        .ok_or_else(ValidationError::invalid_longitude)
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn non_empty_text(value: &Value) -> Option<String> {
    let trimmed = value.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// JSON numbers are taken as-is; strings go through [`parse_number`].
fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn check_latitude(value: f64) -> Option<f64> {
    (-MAX_LATITUDE..=MAX_LATITUDE)
        .contains(&value)
        .then_some(value)
}

fn check_longitude(value: f64) -> Option<f64> {
    (-MAX_LONGITUDE..=MAX_LONGITUDE)
        .contains(&value)
        .then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(value: Value) -> SchoolSubmission {
        serde_json::from_value(value).unwrap()
    }

    fn valid() -> Value {
        json!({
            "name": "ABC School",
            "address": "1 Main St",
            "latitude": 40.7589,
            "longitude": -73.9851,
        })
    }

    #[test]
    fn test_valid_submission() {
        let school = validate_new_school(&submission(valid())).unwrap();
        assert_eq!(school.name(), "ABC School");
        assert_eq!(school.address(), "1 Main St");
        assert_eq!(school.location(), Coordinate::new(40.7589, -73.9851));
    }

    #[test]
    fn test_trims_name_and_address() {
        let mut input = valid();
        input["name"] = json!("  ABC School  ");
        input["address"] = json!("\t1 Main St \n");

        let school = validate_new_school(&submission(input)).unwrap();
        assert_eq!(school.name(), "ABC School");
        assert_eq!(school.address(), "1 Main St");
    }

    #[test]
    fn test_string_coordinates_are_coerced() {
        let mut input = valid();
        input["latitude"] = json!("40.5");
        input["longitude"] = json!(" -73.25 ");

        let school = validate_new_school(&submission(input)).unwrap();
        assert_eq!(school.location(), Coordinate::new(40.5, -73.25));
    }

    #[test]
    fn test_missing_field() {
        for field in ["name", "address", "latitude", "longitude"] {
            let mut input = valid();
            input.as_object_mut().unwrap().remove(field);

            let err = validate_new_school(&submission(input)).unwrap_err();
            assert_eq!(err.field, Field::MissingFields, "removed {field}");
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut input = valid();
        input["latitude"] = Value::Null;

        let err = validate_new_school(&submission(input)).unwrap_err();
        assert_eq!(err, ValidationError::missing_fields());
    }

    #[test]
    fn test_missing_takes_precedence_over_invalid() {
        let input = json!({"name": "", "address": "x", "latitude": 500});
        let err = validate_new_school(&submission(input)).unwrap_err();
        assert_eq!(err.field, Field::MissingFields);
    }

    #[test]
    fn test_invalid_name() {
        for name in [json!(""), json!("   "), json!(42), json!(["a"]), json!(true)] {
            let mut input = valid();
            input["name"] = name.clone();

            let err = validate_new_school(&submission(input)).unwrap_err();
            assert_eq!(err, ValidationError::invalid_name(), "name {name}");
        }
    }

    #[test]
    fn test_invalid_address() {
        let mut input = valid();
        input["address"] = json!("  ");

        let err = validate_new_school(&submission(input)).unwrap_err();
        assert_eq!(err, ValidationError::invalid_address());
    }

    #[test]
    fn test_name_checked_before_address() {
        let mut input = valid();
        input["name"] = json!("");
        input["address"] = json!("");

        let err = validate_new_school(&submission(input)).unwrap_err();
        assert_eq!(err.field, Field::Name);
    }

    #[test]
    fn test_invalid_latitude() {
        for lat in [
            json!(91),
            json!(-90.0001),
            json!("200"),
            json!("abc"),
            json!(""),
            json!("NaN"),
            json!("inf"),
            json!(false),
        ] {
            let mut input = valid();
            input["latitude"] = lat.clone();

            let err = validate_new_school(&submission(input)).unwrap_err();
            assert_eq!(err, ValidationError::invalid_latitude(), "latitude {lat}");
        }
    }

    #[test]
    fn test_invalid_longitude() {
        for lon in [json!(181), json!(-180.0001), json!("x1"), json!({})] {
            let mut input = valid();
            input["longitude"] = lon.clone();

            let err = validate_new_school(&submission(input)).unwrap_err();
            assert_eq!(err, ValidationError::invalid_longitude(), "longitude {lon}");
        }
    }

    #[test]
    fn test_latitude_checked_before_longitude() {
        let mut input = valid();
        input["latitude"] = json!(100);
        input["longitude"] = json!(200);

        let err = validate_new_school(&submission(input)).unwrap_err();
        assert_eq!(err.field, Field::Latitude);
    }

    #[test]
    fn test_boundaries_accepted() {
        let input = json!({
            "name": "Pole",
            "address": "North",
            "latitude": 90,
            "longitude": -180,
        });
        let school = validate_new_school(&submission(input)).unwrap();
        assert_eq!(school.location(), Coordinate::new(90.0, -180.0));
    }

    #[test]
    fn test_validate_coordinate_valid_unchanged() {
        for (lat, lon) in [
            ("0", "0"),
            ("40.7589", "-73.9851"),
            ("-90", "180"),
            ("90", "-180"),
            ("-33.8688", "151.2093"),
        ] {
            let coord = validate_coordinate(Some(lat), Some(lon)).unwrap();
            assert_eq!(coord.latitude, lat.parse::<f64>().unwrap());
            assert_eq!(coord.longitude, lon.parse::<f64>().unwrap());
        }
    }

    #[test]
    fn test_validate_coordinate_both_missing() {
        let err = validate_coordinate(None, None).unwrap_err();
        assert_eq!(err, ValidationError::missing_coordinates());
    }

    #[test]
    fn test_validate_coordinate_one_missing() {
        let err = validate_coordinate(None, Some("10")).unwrap_err();
        assert_eq!(err.field, Field::Latitude);

        let err = validate_coordinate(Some("10"), None).unwrap_err();
        assert_eq!(err.field, Field::Longitude);
    }

    #[test]
    fn test_validate_coordinate_out_of_range() {
        for lat in ["91", "-90.0001", "NaN", "north"] {
            let err = validate_coordinate(Some(lat), Some("0")).unwrap_err();
            assert_eq!(err.field, Field::Latitude, "latitude {lat}");
        }
        for lon in ["181", "-180.0001", "NaN", ""] {
            let err = validate_coordinate(Some("0"), Some(lon)).unwrap_err();
            assert_eq!(err.field, Field::Longitude, "longitude {lon}");
        }
    }

    #[test]
    fn test_error_display_is_reason() {
        let err = ValidationError::invalid_latitude();
        assert_eq!(err.to_string(), "Latitude must be a number between -90 and 90");
    }

    #[test]
    fn test_field_display() {
        assert_eq!(Field::MissingFields.to_string(), "missing_fields");
        assert_eq!(Field::Coordinates.to_string(), "coordinates");
    }

    #[test]
    fn test_error_serializes_field_snake_case() {
        let json = serde_json::to_value(ValidationError::missing_fields()).unwrap();
        assert_eq!(json["field"], "missing_fields");
    }
}
