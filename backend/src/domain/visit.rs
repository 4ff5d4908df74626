//! Visit submission values.

use serde::{Deserialize, Serialize};

use super::{ParkId, UserId};

/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 5;
/// Rating preselected on the submission form.
pub const RATING_DEFAULT: u8 = 5;
/// Longest accepted note, in characters.
pub const NOTE_MAX_CHARS: usize = 2000;

/// Validation errors for visit submissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisitValidationError {
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),
    #[error("note must be at most 2000 characters")]
    NoteTooLong,
}

/// Star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate a submitted rating.
    pub fn new(value: i64) -> Result<Self, VisitValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (RATING_MIN..=RATING_MAX).contains(v))
            .map(Self)
            .ok_or(VisitValidationError::RatingOutOfRange(value))
    }

    /// Raw value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(RATING_DEFAULT)
    }
}

impl TryFrom<i64> for Rating {
    type Error = VisitValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Free-text note attached to a visit. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VisitNote(String);

impl VisitNote {
    /// Validate a submitted note.
    pub fn new(raw: impl Into<String>) -> Result<Self, VisitValidationError> {
        let raw = raw.into();
        if raw.chars().count() > NOTE_MAX_CHARS {
            return Err(VisitValidationError::NoteTooLong);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for VisitNote {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for VisitNote {
    type Error = VisitValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VisitNote> for String {
    fn from(value: VisitNote) -> Self {
        value.0
    }
}

/// A visit about to be inserted. The store assigns the visit date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub user_id: UserId,
    pub park_id: ParkId,
    pub rating: Rating,
    pub note: VisitNote,
}
