//! Page state for the single-page client.
//!
//! The client renders exactly what [`ViewState`] describes: either the login
//! form or the authenticated page (sidebar, map, role-specific panel). Every
//! state change is followed by a fresh fetch, so nothing here is incremental.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    AuthenticatedUser, ComposedMap, NOTE_MAX_CHARS, ParkOption, ParkVisitStat, RATING_DEFAULT,
    RATING_MAX, RATING_MIN, Role,
};

/// Endpoint the login form submits to.
pub const LOGIN_ACTION: &str = "/api/v1/login";
/// Endpoint the logout control calls.
pub const LOGOUT_ACTION: &str = "/api/v1/logout";
/// Endpoint the visit form submits to.
pub const VISIT_ACTION: &str = "/api/v1/visits";
/// Message shown once a user has visited every park.
pub const ALL_VISITED_MESSAGE: &str = "You have visited every park!";

/// Login form descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub action: String,
    pub username_label: String,
    pub password_label: String,
    pub submit_label: String,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            action: LOGIN_ACTION.to_owned(),
            username_label: "Username".to_owned(),
            password_label: "Password".to_owned(),
            submit_label: "Login".to_owned(),
        }
    }
}

/// Sidebar with the session owner and the logout control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub username: String,
    pub logout_action: String,
}

/// Bar chart of visit counts, x = park name, y = visit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitChart {
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<ParkVisitStat>,
}

/// Rating slider bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingInput {
    pub min: u8,
    pub max: u8,
    pub default: u8,
}

impl Default for RatingInput {
    fn default() -> Self {
        Self {
            min: RATING_MIN,
            max: RATING_MAX,
            default: RATING_DEFAULT,
        }
    }
}

/// Free-text note field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub max_chars: usize,
}

/// Role-specific panel rendered under the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    /// Aggregate statistics for administrators.
    AdminPanel { chart: VisitChart },
    /// Visit submission restricted to unvisited parks.
    VisitForm {
        action: String,
        parks: Vec<ParkOption>,
        rating: RatingInput,
        note: NoteInput,
    },
    /// Shown once nothing is left to visit.
    AllVisited { message: String },
}

impl Panel {
    /// Panel for an administrator.
    pub fn admin(stats: Vec<ParkVisitStat>) -> Self {
        Self::AdminPanel {
            chart: VisitChart {
                x_label: "Park".to_owned(),
                y_label: "Visits".to_owned(),
                bars: stats,
            },
        }
    }

    /// Panel for a regular user given the unvisited parks collected while
    /// composing the map.
    pub fn for_user(unvisited: Vec<ParkOption>) -> Self {
        if unvisited.is_empty() {
            return Self::AllVisited {
                message: ALL_VISITED_MESSAGE.to_owned(),
            };
        }
        Self::VisitForm {
            action: VISIT_ACTION.to_owned(),
            parks: unvisited,
            rating: RatingInput::default(),
            note: NoteInput {
                max_chars: NOTE_MAX_CHARS,
            },
        }
    }
}

/// Everything the client renders for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Unauthenticated {
        #[serde(rename = "loginForm")]
        login_form: LoginForm,
    },
    Authenticated {
        sidebar: Sidebar,
        map: ComposedMap,
        panel: Panel,
    },
}

impl ViewState {
    /// Login page.
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated {
            login_form: LoginForm::default(),
        }
    }

    /// Authenticated page. `stats` is only consulted for administrators.
    ///
    /// # Examples
    /// ```
    /// use parkmap::domain::ports::empty_collection;
    /// use parkmap::domain::{
    ///     compose_map, AuthenticatedUser, Panel, Role, UserId, Username, ViewState,
    /// };
    ///
    /// let user = AuthenticatedUser::new(
    ///     UserId::new(2).unwrap(),
    ///     Username::new("ana").unwrap(),
    ///     Role::User,
    /// );
    /// let map = compose_map(empty_collection(), empty_collection(), &[], Role::User).unwrap();
    /// let ViewState::Authenticated { panel, .. } = ViewState::authenticated(&user, map, Vec::new())
    /// else {
    ///     unreachable!()
    /// };
    /// assert!(matches!(panel, Panel::AllVisited { .. }));
    /// ```
    pub fn authenticated(
        user: &AuthenticatedUser,
        map: ComposedMap,
        stats: Vec<ParkVisitStat>,
    ) -> Self {
        let panel = match user.role() {
            Role::Admin => Panel::admin(stats),
            Role::User => Panel::for_user(map.unvisited.clone()),
        };
        Self::Authenticated {
            sidebar: Sidebar {
                username: user.username().to_string(),
                logout_action: LOGOUT_ACTION.to_owned(),
            },
            map,
            panel,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::empty_collection;
    use crate::domain::{
        Centroid, ParkId, ParkStatus, ParkVisitInfo, UserId, Username, compose_map,
    };
    use rstest::rstest;
    use serde_json::json;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new(2).expect("valid id"),
            Username::new("ana").expect("valid username"),
            role,
        )
    }

    fn map_with(rows: &[ParkStatus], role: Role) -> ComposedMap {
        compose_map(empty_collection(), empty_collection(), rows, role).expect("composes")
    }

    fn row(id: i32, name: &str, visit: ParkVisitInfo) -> ParkStatus {
        ParkStatus {
            id: ParkId::new(id).expect("valid id"),
            name: name.to_owned(),
            centroid: Centroid::new(45.8, 15.9).expect("valid centroid"),
            visit,
        }
    }

    #[rstest]
    fn unauthenticated_view_serialises_login_form() {
        let value = serde_json::to_value(ViewState::unauthenticated()).expect("serialise");
        assert_eq!(value["state"], json!("unauthenticated"));
        assert_eq!(value["loginForm"]["action"], json!("/api/v1/login"));
    }

    #[rstest]
    fn user_with_unvisited_parks_gets_restricted_picker() {
        let rows = [
            row(3, "Bundek", ParkVisitInfo::user(None)),
            row(7, "Maksimir", ParkVisitInfo::user(chrono::NaiveDate::from_ymd_opt(2025, 1, 2))),
        ];
        let view = ViewState::authenticated(&user(Role::User), map_with(&rows, Role::User), vec![]);
        let ViewState::Authenticated { sidebar, panel, .. } = view else {
            panic!("expected authenticated view");
        };
        assert_eq!(sidebar.username, "ana");
        let Panel::VisitForm { parks, rating, .. } = panel else {
            panic!("expected visit form");
        };
        assert_eq!(parks.len(), 1);
        assert_eq!(parks[0].id.get(), 3);
        assert_eq!(rating, RatingInput { min: 1, max: 5, default: 5 });
    }

    #[rstest]
    fn user_with_everything_visited_gets_completion_message() {
        let rows = [row(
            7,
            "Maksimir",
            ParkVisitInfo::user(chrono::NaiveDate::from_ymd_opt(2025, 1, 2)),
        )];
        let view = ViewState::authenticated(&user(Role::User), map_with(&rows, Role::User), vec![]);
        assert!(matches!(
            view,
            ViewState::Authenticated {
                panel: Panel::AllVisited { .. },
                ..
            }
        ));
    }

    #[rstest]
    fn admin_gets_chart_of_stats() {
        let stats = vec![
            ParkVisitStat {
                park_name: "Maksimir".into(),
                visit_count: 2,
            },
            ParkVisitStat {
                park_name: "Bundek".into(),
                visit_count: 0,
            },
        ];
        let view = ViewState::authenticated(
            &user(Role::Admin),
            map_with(&[], Role::Admin),
            stats.clone(),
        );
        let value = serde_json::to_value(&view).expect("serialise");
        assert_eq!(value["panel"]["kind"], json!("admin_panel"));
        assert_eq!(value["panel"]["chart"]["bars"][1]["visitCount"], json!(0));
        let ViewState::Authenticated {
            panel: Panel::AdminPanel { chart },
            ..
        } = view
        else {
            panic!("expected admin panel");
        };
        assert_eq!(chart.bars, stats);
    }
}
