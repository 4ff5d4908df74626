//! Driving port for recording visits.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, ParkId, Rating, VisitNote};

/// Validated visit form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitSubmission {
    pub park_id: ParkId,
    pub rating: Rating,
    pub note: VisitNote,
}

/// Domain use-case port for visit submission.
#[async_trait]
pub trait VisitCommand: Send + Sync {
    /// Record a visit for `user`. Administrators are rejected.
    async fn record_visit(
        &self,
        user: &AuthenticatedUser,
        submission: VisitSubmission,
    ) -> Result<(), Error>;
}
