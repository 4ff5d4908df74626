//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - AuthenticatedUser, Role: session identity.
//! - ParkStatus, ParkVisitInfo, ParkVisitStat: park rows read from the store.
//! - ComposedMap, ViewState: documents rendered by the client.
//! - ParkMapService, VisitService, CredentialsLoginService: driving port
//!   implementations.

pub mod auth;
pub mod error;
pub mod login_service;
pub mod map;
pub mod park;
pub mod park_map_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod view;
pub mod visit;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PasswordCheck, StoredCredentials, StoredPassword,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::login_service::CredentialsLoginService;
pub use self::map::{
    ComposedMap, LayerKind, LayerStyle, MapCompositionError, MapLayer, MapViewport, Marker,
    MarkerColor, MarkerGlyph, MarkerIcon, Popup, compose_map,
};
pub use self::park::{
    Centroid, ParkId, ParkOption, ParkStatus, ParkValidationError, ParkVisitInfo, ParkVisitStat,
    UNKNOWN_PARK, UNNAMED_PARK,
};
pub use self::park_map_service::{ParkMapService, VisitService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{AuthenticatedUser, Role, UserId, UserValidationError, Username};
pub use self::view::{
    LoginForm, NoteInput, Panel, RatingInput, Sidebar, ViewState, VisitChart,
};
pub use self::visit::{
    NOTE_MAX_CHARS, NewVisit, RATING_DEFAULT, RATING_MAX, RATING_MIN, Rating, VisitNote,
    VisitValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use parkmap::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
