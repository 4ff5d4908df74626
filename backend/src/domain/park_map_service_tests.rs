//! Tests for the park map services.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    FixtureBoundaryRepository, MockBoundaryRepository, MockParkRepository, MockVisitRepository,
    empty_collection,
};
use crate::domain::{
    Centroid, ErrorCode, Panel, ParkId, ParkVisitInfo, Rating, Role, UserId, Username, VisitNote,
};

fn user(role: Role) -> AuthenticatedUser {
    let (id, name) = match role {
        Role::Admin => (1, "root"),
        Role::User => (2, "ana"),
    };
    AuthenticatedUser::new(
        UserId::new(id).expect("valid id"),
        Username::new(name).expect("valid username"),
        role,
    )
}

fn status(id: i32, name: &str, visit: ParkVisitInfo) -> ParkStatus {
    ParkStatus {
        id: ParkId::new(id).expect("valid id"),
        name: name.to_owned(),
        centroid: Centroid::new(45.1, 15.2).expect("valid centroid"),
        visit,
    }
}

fn submission(park: i32) -> VisitSubmission {
    VisitSubmission {
        park_id: ParkId::new(park).expect("valid id"),
        rating: Rating::new(4).expect("valid rating"),
        note: VisitNote::new("nice").expect("valid note"),
    }
}

fn query_service(
    parks: MockParkRepository,
) -> ParkMapService<FixtureBoundaryRepository, MockParkRepository> {
    ParkMapService::new(Arc::new(FixtureBoundaryRepository), Arc::new(parks))
}

#[fixture]
fn admin_stats() -> Vec<ParkVisitStat> {
    vec![
        ParkVisitStat {
            park_name: "Maksimir".into(),
            visit_count: 4,
        },
        ParkVisitStat {
            park_name: "Bundek".into(),
            visit_count: 0,
        },
    ]
}

#[rstest]
#[tokio::test]
async fn view_without_session_skips_every_repository() {
    let mut parks = MockParkRepository::new();
    parks.expect_parks_for_user().times(0);
    parks.expect_admin_stats().times(0);
    let view = query_service(parks).view(None).await.expect("view builds");
    assert_eq!(view, ViewState::unauthenticated());
}

#[rstest]
#[tokio::test]
async fn user_view_offers_only_unvisited_parks() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 1);
    let mut parks = MockParkRepository::new();
    parks
        .expect_parks_for_user()
        .withf(|user_id, role| user_id.get() == 2 && *role == Role::User)
        .times(1)
        .return_once(move |_, _| {
            Ok(vec![
                status(3, "Bundek", ParkVisitInfo::user(None)),
                status(7, "Maksimir", ParkVisitInfo::user(date)),
            ])
        });
    parks.expect_admin_stats().times(0);

    let view = query_service(parks)
        .view(Some(&user(Role::User)))
        .await
        .expect("view builds");
    let ViewState::Authenticated { panel, map, .. } = view else {
        panic!("expected authenticated view");
    };
    assert_eq!(map.markers.len(), 2);
    let Panel::VisitForm { parks, .. } = panel else {
        panic!("expected visit form");
    };
    assert_eq!(parks.len(), 1);
    assert_eq!(parks[0].name, "Bundek");
}

#[rstest]
#[tokio::test]
async fn admin_view_includes_chart(admin_stats: Vec<ParkVisitStat>) {
    let expected = admin_stats.clone();
    let mut parks = MockParkRepository::new();
    parks
        .expect_parks_for_user()
        .times(1)
        .return_once(|_, _| Ok(vec![status(1, "Maksimir", ParkVisitInfo::Admin { visit_count: 4 })]));
    parks
        .expect_admin_stats()
        .times(1)
        .return_once(move || Ok(admin_stats));

    let view = query_service(parks)
        .view(Some(&user(Role::Admin)))
        .await
        .expect("view builds");
    let ViewState::Authenticated {
        panel: Panel::AdminPanel { chart },
        ..
    } = view
    else {
        panic!("expected admin panel");
    };
    assert_eq!(chart.bars, expected);
}

#[rstest]
#[tokio::test]
async fn stats_are_forbidden_for_regular_users() {
    let mut parks = MockParkRepository::new();
    parks.expect_admin_stats().times(0);
    let err = query_service(parks)
        .stats(&user(Role::User))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn mismatched_rows_surface_as_internal_errors() {
    let mut parks = MockParkRepository::new();
    parks
        .expect_parks_for_user()
        .times(1)
        .return_once(|_, _| Ok(vec![status(1, "Maksimir", ParkVisitInfo::user(None))]));
    let err = query_service(parks)
        .map(&user(Role::Admin))
        .await
        .expect_err("composition fails");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[case(BoundaryRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(BoundaryRepositoryError::query("bad geometry"), ErrorCode::InternalError)]
#[tokio::test]
async fn boundary_failures_abort_the_map(
    #[case] failure: BoundaryRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut boundaries = MockBoundaryRepository::new();
    boundaries
        .expect_fetch_regions()
        .returning(move || Err(failure.clone()));
    boundaries
        .expect_fetch_parks()
        .returning(|| Ok(empty_collection()));
    let mut parks = MockParkRepository::new();
    parks.expect_parks_for_user().returning(|_, _| Ok(Vec::new()));

    let service = ParkMapService::new(Arc::new(boundaries), Arc::new(parks));
    let err = service
        .map(&user(Role::User))
        .await
        .expect_err("map fails");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn record_visit_stamps_the_session_user() {
    let mut visits = MockVisitRepository::new();
    visits
        .expect_record_visit()
        .withf(|visit| {
            visit.user_id.get() == 2
                && visit.park_id.get() == 7
                && visit.rating.get() == 4
                && visit.note.as_ref() == "nice"
        })
        .times(1)
        .return_once(|_| Ok(()));

    VisitService::new(Arc::new(visits))
        .record_visit(&user(Role::User), submission(7))
        .await
        .expect("visit recorded");
}

#[rstest]
#[tokio::test]
async fn admins_cannot_record_visits() {
    let mut visits = MockVisitRepository::new();
    visits.expect_record_visit().times(0);
    let err = VisitService::new(Arc::new(visits))
        .record_visit(&user(Role::Admin), submission(7))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(VisitRepositoryError::duplicate_visit(), ErrorCode::Conflict)]
#[case(VisitRepositoryError::unknown_park(), ErrorCode::NotFound)]
#[case(VisitRepositoryError::connection("pool timed out"), ErrorCode::ServiceUnavailable)]
#[case(VisitRepositoryError::query("check violation"), ErrorCode::InternalError)]
#[tokio::test]
async fn visit_failures_are_distinguished(
    #[case] failure: VisitRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut visits = MockVisitRepository::new();
    visits
        .expect_record_visit()
        .times(1)
        .return_once(move |_| Err(failure));
    let err = VisitService::new(Arc::new(visits))
        .record_visit(&user(Role::User), submission(7))
        .await
        .expect_err("insert fails");
    assert_eq!(err.code(), expected);
    match expected {
        ErrorCode::Conflict => {
            assert_eq!(err.message(), "visit already recorded for this park");
        }
        ErrorCode::ServiceUnavailable => assert_eq!(err.message(), STORE_UNAVAILABLE),
        _ => {}
    }
}

#[rstest]
#[tokio::test]
async fn outage_details_stay_out_of_client_messages() {
    let mut parks = MockParkRepository::new();
    parks.expect_admin_stats().times(1).return_once(|| {
        Err(ParkRepositoryError::connection(
            "password authentication failed for user \"parkmap\"",
        ))
    });
    let err = query_service(parks)
        .stats(&user(Role::Admin))
        .await
        .expect_err("stats fail");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(err.message(), "park store unavailable");
    assert!(!err.message().contains("parkmap"));
}
