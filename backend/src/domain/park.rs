//! Parks, their centroids, and per-role visit information.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name shown for parks stored without one on the map and in the picker.
pub const UNNAMED_PARK: &str = "Park";
/// Name shown for parks stored without one in the statistics chart.
pub const UNKNOWN_PARK: &str = "Unknown park";

/// Validation errors for park values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParkValidationError {
    #[error("park id must be positive")]
    NonPositiveId,
    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),
    #[error("visit count {0} is negative")]
    NegativeVisitCount(i64),
}

/// Store identifier of a park.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct ParkId(i32);

impl ParkId {
    /// Validate and construct a [`ParkId`].
    pub fn new(id: i32) -> Result<Self, ParkValidationError> {
        if id <= 0 {
            return Err(ParkValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw database value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for ParkId {
    type Error = ParkValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParkId> for i32 {
    fn from(value: ParkId) -> Self {
        value.0
    }
}

impl fmt::Display for ParkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// WGS84 point derived by the store from a park polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Centroid {
    lat: f64,
    lon: f64,
}

impl Centroid {
    /// Validate and construct a centroid.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ParkValidationError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ParkValidationError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ParkValidationError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Build from crate constants already known to be in range.
    pub(crate) const fn from_trusted(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Visit information attached to a park row.
///
/// Admin rows carry the total count across all users; user rows carry the
/// date of that user's own visit, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParkVisitInfo {
    /// Aggregate across every user.
    #[serde(rename_all = "camelCase")]
    Admin { visit_count: u64 },
    /// The requesting user's own visit.
    #[serde(rename_all = "camelCase")]
    User { visited_on: Option<NaiveDate> },
}

impl ParkVisitInfo {
    /// Build admin info from a store count.
    pub fn admin(visit_count: i64) -> Result<Self, ParkValidationError> {
        u64::try_from(visit_count)
            .map(|visit_count| Self::Admin { visit_count })
            .map_err(|_| ParkValidationError::NegativeVisitCount(visit_count))
    }

    /// Build user info from an optional visit date.
    pub fn user(visited_on: Option<NaiveDate>) -> Self {
        Self::User { visited_on }
    }

    /// Whether a user row has no recorded visit.
    pub fn is_unvisited_by_user(&self) -> bool {
        matches!(self, Self::User { visited_on: None })
    }
}

/// One park with its centroid and role-dependent visit information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParkStatus {
    #[schema(value_type = i32, example = 7)]
    pub id: ParkId,
    pub name: String,
    pub centroid: Centroid,
    pub visit: ParkVisitInfo,
}

/// Aggregate count of visits for one park.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParkVisitStat {
    pub park_name: String,
    pub visit_count: u64,
}

/// Entry in the unvisited-park picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParkOption {
    #[schema(value_type = i32, example = 7)]
    pub id: ParkId,
    pub name: String,
}
