//! PostGIS-backed region and park boundary layers.
//!
//! Geometry never crosses the wire in binary form: the store simplifies and
//! serialises it with `ST_AsGeoJSON`, and each row becomes one feature with a
//! `name` property.

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::Double;
use diesel_async::RunQueryDsl;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::{Map, Value};

use crate::domain::UNNAMED_PARK;
use crate::domain::ports::{
    BoundaryRepository, BoundaryRepositoryError, NAME_PROPERTY, REGION_SIMPLIFY_TOLERANCE,
};

use super::diesel_helpers::{collect_rows, map_pool_error_message, map_read_error};
use super::models::BoundaryRow;
use super::pool::{DbPool, PoolError};

const REGIONS_SQL: &str = r#"
SELECT name, ST_AsGeoJSON(ST_Simplify(geom, $1)) AS geojson
FROM regions
ORDER BY id
"#;

const PARKS_SQL: &str = r#"
SELECT COALESCE(name, $1) AS name, ST_AsGeoJSON(geom) AS geojson
FROM parks
ORDER BY id
"#;

/// Diesel-backed implementation of [`BoundaryRepository`].
#[derive(Clone)]
pub struct DieselBoundaryRepository {
    pool: DbPool,
}

impl DieselBoundaryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BoundaryRepositoryError {
    BoundaryRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> BoundaryRepositoryError {
    map_read_error(
        error,
        "boundary read",
        BoundaryRepositoryError::query,
        BoundaryRepositoryError::connection,
    )
}

fn row_to_feature(row: BoundaryRow) -> Result<Feature, String> {
    let geometry: Geometry = row
        .geojson
        .parse::<geojson::GeoJson>()
        .map_err(|err| format!("invalid geometry for '{}': {err}", row.name))
        .and_then(|parsed| {
            Geometry::try_from(parsed)
                .map_err(|err| format!("geometry for '{}' is not a bare geometry: {err}", row.name))
        })?;
    let mut properties = Map::new();
    properties.insert(NAME_PROPERTY.to_owned(), Value::String(row.name));
    Ok(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

fn rows_to_collection(rows: Vec<BoundaryRow>) -> Result<FeatureCollection, BoundaryRepositoryError> {
    let features = collect_rows(rows.into_iter().map(row_to_feature), BoundaryRepositoryError::query)?;
    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

#[async_trait]
impl BoundaryRepository for DieselBoundaryRepository {
    async fn fetch_regions(&self) -> Result<FeatureCollection, BoundaryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BoundaryRow> = sql_query(REGIONS_SQL)
            .bind::<Double, _>(REGION_SIMPLIFY_TOLERANCE)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_collection(rows)
    }

    async fn fetch_parks(&self) -> Result<FeatureCollection, BoundaryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BoundaryRow> = sql_query(PARKS_SQL)
            .bind::<diesel::sql_types::Text, _>(UNNAMED_PARK)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_collection(rows)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn row(name: &str, geojson: &str) -> BoundaryRow {
        BoundaryRow {
            name: name.to_owned(),
            geojson: geojson.to_owned(),
        }
    }

    #[rstest]
    fn rows_keep_name_and_geometry() {
        let polygon = r#"{"type":"Polygon","coordinates":[[[15.9,45.8],[16.0,45.8],[16.0,45.9],[15.9,45.8]]]}"#;
        let collection =
            rows_to_collection(vec![row("Grad Zagreb", polygon)]).expect("valid rows");

        let feature = &collection.features[0];
        assert_eq!(
            feature.property(NAME_PROPERTY),
            Some(&Value::String("Grad Zagreb".to_owned()))
        );
        let geometry = feature.geometry.as_ref().expect("geometry present");
        let geojson::Value::Polygon(rings) = &geometry.value else {
            panic!("expected polygon, got {:?}", geometry.value);
        };
        assert_eq!(rings[0].len(), 4);
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"type":"Feature","geometry":null,"properties":{}}"#)]
    fn malformed_geometry_is_a_query_error(#[case] geojson: &str) {
        let err = rows_to_collection(vec![row("Broken", geojson)]).expect_err("invalid row");
        assert!(matches!(err, BoundaryRepositoryError::Query { .. }));
        assert!(err.to_string().contains("Broken"));
    }

    #[rstest]
    fn region_tolerance_is_bound_as_degrees() {
        assert!(REGIONS_SQL.contains("ST_Simplify(geom, $1)"));
        assert!(!PARKS_SQL.contains("ST_Simplify"));
    }
}
