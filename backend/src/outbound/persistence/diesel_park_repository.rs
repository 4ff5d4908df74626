//! PostGIS-backed park rows and visit statistics.

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::{Int4, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ParkRepository, ParkRepositoryError};
use crate::domain::{
    Centroid, ParkId, ParkStatus, ParkVisitInfo, ParkVisitStat, Role, UNKNOWN_PARK, UNNAMED_PARK,
    UserId,
};

use super::diesel_helpers::{collect_rows, map_pool_error_message, map_read_error};
use super::models::{AdminParkRow, ParkStatRow, UserParkRow};
use super::pool::{DbPool, PoolError};

const ADMIN_PARKS_SQL: &str = r#"
SELECT
    p.id,
    COALESCE(p.name, $1) AS name,
    ST_Y(ST_Centroid(p.geom)) AS lat,
    ST_X(ST_Centroid(p.geom)) AS lon,
    (SELECT COUNT(*) FROM visits v WHERE v.park_id = p.id) AS visit_count
FROM parks p
"#;

const USER_PARKS_SQL: &str = r#"
SELECT
    p.id,
    COALESCE(p.name, $1) AS name,
    ST_Y(ST_Centroid(p.geom)) AS lat,
    ST_X(ST_Centroid(p.geom)) AS lon,
    v.visited_on
FROM parks p
LEFT JOIN visits v ON v.park_id = p.id AND v.user_id = $2
ORDER BY p.name, p.id
"#;

const ADMIN_STATS_SQL: &str = r#"
SELECT
    COALESCE(p.name, $1) AS park_name,
    COUNT(v.id) AS visit_count
FROM parks p
LEFT JOIN visits v ON v.park_id = p.id
GROUP BY p.id, p.name
ORDER BY visit_count DESC, park_name ASC
"#;

/// Diesel-backed implementation of [`ParkRepository`].
#[derive(Clone)]
pub struct DieselParkRepository {
    pool: DbPool,
}

impl DieselParkRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ParkRepositoryError {
    ParkRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ParkRepositoryError {
    map_read_error(
        error,
        "park read",
        ParkRepositoryError::query,
        ParkRepositoryError::connection,
    )
}

fn park_header(id: i32, lat: f64, lon: f64) -> Result<(ParkId, Centroid), String> {
    let park_id = ParkId::new(id).map_err(|err| format!("invalid park id {id}: {err}"))?;
    let centroid =
        Centroid::new(lat, lon).map_err(|err| format!("invalid centroid for park {id}: {err}"))?;
    Ok((park_id, centroid))
}

fn admin_row_to_status(row: AdminParkRow) -> Result<ParkStatus, String> {
    let (id, centroid) = park_header(row.id, row.lat, row.lon)?;
    let visit = ParkVisitInfo::admin(row.visit_count)
        .map_err(|err| format!("invalid visit count for park {}: {err}", row.id))?;
    Ok(ParkStatus {
        id,
        name: row.name,
        centroid,
        visit,
    })
}

fn user_row_to_status(row: UserParkRow) -> Result<ParkStatus, String> {
    let (id, centroid) = park_header(row.id, row.lat, row.lon)?;
    Ok(ParkStatus {
        id,
        name: row.name,
        centroid,
        visit: ParkVisitInfo::user(row.visited_on),
    })
}

fn stat_row_to_stat(row: ParkStatRow) -> Result<ParkVisitStat, String> {
    let visit_count = u64::try_from(row.visit_count)
        .map_err(|_| format!("negative visit count for '{}'", row.park_name))?;
    Ok(ParkVisitStat {
        park_name: row.park_name,
        visit_count,
    })
}

#[async_trait]
impl ParkRepository for DieselParkRepository {
    async fn parks_for_user(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<Vec<ParkStatus>, ParkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        match role {
            Role::Admin => {
                let rows: Vec<AdminParkRow> = sql_query(ADMIN_PARKS_SQL)
                    .bind::<Text, _>(UNNAMED_PARK)
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                collect_rows(rows.into_iter().map(admin_row_to_status), ParkRepositoryError::query)
            }
            Role::User => {
                let rows: Vec<UserParkRow> = sql_query(USER_PARKS_SQL)
                    .bind::<Text, _>(UNNAMED_PARK)
                    .bind::<Int4, _>(user_id.get())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                collect_rows(rows.into_iter().map(user_row_to_status), ParkRepositoryError::query)
            }
        }
    }

    async fn admin_stats(&self) -> Result<Vec<ParkVisitStat>, ParkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ParkStatRow> = sql_query(ADMIN_STATS_SQL)
            .bind::<Text, _>(UNKNOWN_PARK)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows.into_iter().map(stat_row_to_stat), ParkRepositoryError::query)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    fn admin_rows_carry_counts() {
        let status = admin_row_to_status(AdminParkRow {
            id: 7,
            name: "Maksimir".into(),
            lat: 45.83,
            lon: 16.02,
            visit_count: 3,
        })
        .expect("valid row");
        assert_eq!(status.visit, ParkVisitInfo::Admin { visit_count: 3 });
        assert_eq!(status.centroid.lat(), 45.83);
    }

    #[rstest]
    #[case(None, true)]
    #[case(NaiveDate::from_ymd_opt(2025, 4, 2), false)]
    fn user_rows_carry_optional_dates(#[case] visited_on: Option<NaiveDate>, #[case] unvisited: bool) {
        let status = user_row_to_status(UserParkRow {
            id: 3,
            name: "Bundek".into(),
            lat: 45.78,
            lon: 15.99,
            visited_on,
        })
        .expect("valid row");
        assert_eq!(status.visit.is_unvisited_by_user(), unvisited);
    }

    #[rstest]
    fn invalid_centroids_are_reported() {
        let err = user_row_to_status(UserParkRow {
            id: 3,
            name: "Nowhere".into(),
            lat: 120.0,
            lon: 15.99,
            visited_on: None,
        })
        .expect_err("invalid centroid");
        assert!(err.contains("park 3"));
    }

    #[rstest]
    fn stats_reject_negative_counts() {
        assert!(
            stat_row_to_stat(ParkStatRow {
                park_name: "Bundek".into(),
                visit_count: -1,
            })
            .is_err()
        );
    }

    #[rstest]
    fn stats_query_orders_ties_by_name() {
        assert!(ADMIN_STATS_SQL.contains("ORDER BY visit_count DESC, park_name ASC"));
        assert!(ADMIN_STATS_SQL.contains("LEFT JOIN visits"));
    }
}
