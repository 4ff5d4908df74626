//! Map composition: turns boundary layers and park status rows into a map
//! document a slippy-map client can render without further decisions.
//!
//! Layers are emitted in paint order. Regions come first, park polygons
//! second, markers last, so later entries occlude earlier ones.

use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ports::NAME_PROPERTY;
use super::{Centroid, ParkOption, ParkStatus, ParkVisitInfo, Role};

/// Latitude of the initial map centre.
pub const MAP_CENTER_LAT: f64 = 44.5;
/// Longitude of the initial map centre.
pub const MAP_CENTER_LON: f64 = 16.0;
/// Initial zoom level; shows the whole country.
pub const MAP_ZOOM: u8 = 7;
/// Base tile style.
pub const MAP_TILES: &str = "CartoDB positron";
/// Rendered map width in pixels.
pub const MAP_WIDTH_PX: u32 = 1000;
/// Rendered map height in pixels.
pub const MAP_HEIGHT_PX: u32 = 600;
/// Maximum popup width in pixels.
pub const POPUP_MAX_WIDTH_PX: u32 = 300;
/// Icon font family prefix for marker icons.
pub const ICON_PREFIX: &str = "fa";

/// Errors raised while composing a map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapCompositionError {
    /// A park row carried visit information for the other role.
    #[error("park {park_id} carries {found} visit info in a {expected} map")]
    RoleMismatch {
        park_id: i32,
        expected: Role,
        found: Role,
    },
}

/// Fixed camera and canvas settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapViewport {
    pub center: Centroid,
    pub zoom: u8,
    pub tiles: String,
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: Centroid::from_trusted(MAP_CENTER_LAT, MAP_CENTER_LON),
            zoom: MAP_ZOOM,
            tiles: MAP_TILES.to_owned(),
            width_px: MAP_WIDTH_PX,
            height_px: MAP_HEIGHT_PX,
        }
    }
}

/// Which boundary set a polygon layer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Regions,
    Parks,
}

/// Polygon styling shared by every feature of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub fill_color: String,
    pub color: String,
    pub weight: u8,
    pub fill_opacity: f64,
}

impl LayerStyle {
    fn for_kind(kind: LayerKind) -> Self {
        let (fill_color, color) = match kind {
            LayerKind::Regions => ("white", "#1001DF"),
            LayerKind::Parks => ("orange", "#00000026"),
        };
        Self {
            fill_color: fill_color.to_owned(),
            color: color.to_owned(),
            weight: 2,
            fill_opacity: 0.4,
        }
    }
}

/// A styled polygon layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapLayer {
    pub kind: LayerKind,
    pub style: LayerStyle,
    /// Feature property shown on hover, without a label.
    pub tooltip_field: String,
    #[schema(value_type = Object)]
    pub features: FeatureCollection,
}

impl MapLayer {
    fn build(kind: LayerKind, features: FeatureCollection) -> Option<Self> {
        if features.features.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            style: LayerStyle::for_kind(kind),
            tooltip_field: NAME_PROPERTY.to_owned(),
            features,
        })
    }
}

/// Marker colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    Blue,
    Green,
    Red,
}

/// Marker glyph from the icon font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MarkerGlyph {
    Users,
    Check,
    Times,
}

/// Marker icon descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub color: MarkerColor,
    pub icon: MarkerGlyph,
    pub prefix: String,
}

/// Click popup content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub html: String,
    pub max_width_px: u32,
}

/// One park marker placed at the park centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub location: Centroid,
    pub tooltip: String,
    pub popup: Popup,
    pub icon: MarkerIcon,
}

/// Fully composed map for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComposedMap {
    pub viewport: MapViewport,
    pub layers: Vec<MapLayer>,
    pub markers: Vec<Marker>,
    /// Parks the requesting user has not visited, in row order. Always empty
    /// for admin maps.
    pub unvisited: Vec<ParkOption>,
}

/// Compose the map for `role` from the two boundary layers and the park rows.
///
/// # Examples
/// ```
/// use parkmap::domain::ports::empty_collection;
/// use parkmap::domain::{compose_map, Centroid, ParkId, ParkStatus, ParkVisitInfo, Role};
///
/// let parks = vec![ParkStatus {
///     id: ParkId::new(7).unwrap(),
///     name: "Plitvice".into(),
///     centroid: Centroid::new(44.88, 15.62).unwrap(),
///     visit: ParkVisitInfo::user(None),
/// }];
/// let map = compose_map(empty_collection(), empty_collection(), &parks, Role::User).unwrap();
/// assert!(map.layers.is_empty());
/// assert_eq!(map.unvisited.len(), 1);
/// ```
pub fn compose_map(
    regions: FeatureCollection,
    parks: FeatureCollection,
    statuses: &[ParkStatus],
    role: Role,
) -> Result<ComposedMap, MapCompositionError> {
    let layers = [
        MapLayer::build(LayerKind::Regions, regions),
        MapLayer::build(LayerKind::Parks, parks),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut markers = Vec::with_capacity(statuses.len());
    let mut unvisited = Vec::new();
    for status in statuses {
        let (color, glyph, text) = marker_appearance(status, role)?;
        if status.visit.is_unvisited_by_user() {
            unvisited.push(ParkOption {
                id: status.id,
                name: status.name.clone(),
            });
        }
        markers.push(Marker {
            location: status.centroid,
            tooltip: status.name.clone(),
            popup: Popup {
                html: format!("<h5>{}</h5>{text}", escape_html(&status.name)),
                max_width_px: POPUP_MAX_WIDTH_PX,
            },
            icon: MarkerIcon {
                color,
                icon: glyph,
                prefix: ICON_PREFIX.to_owned(),
            },
        });
    }

    Ok(ComposedMap {
        viewport: MapViewport::default(),
        layers,
        markers,
        unvisited,
    })
}

fn marker_appearance(
    status: &ParkStatus,
    role: Role,
) -> Result<(MarkerColor, MarkerGlyph, String), MapCompositionError> {
    match (role, status.visit) {
        (Role::Admin, ParkVisitInfo::Admin { visit_count }) if visit_count > 0 => Ok((
            MarkerColor::Blue,
            MarkerGlyph::Users,
            format!("Total visits recorded: <b>{visit_count}</b>"),
        )),
        (Role::Admin, ParkVisitInfo::Admin { .. }) => Ok((
            MarkerColor::Red,
            MarkerGlyph::Times,
            "Nobody has visited this park yet.".to_owned(),
        )),
        (Role::User, ParkVisitInfo::User { visited_on: Some(date) }) => Ok((
            MarkerColor::Green,
            MarkerGlyph::Check,
            format!("You visited on {date}"),
        )),
        (Role::User, ParkVisitInfo::User { visited_on: None }) => Ok((
            MarkerColor::Red,
            MarkerGlyph::Times,
            "You have not visited this park yet.".to_owned(),
        )),
        (expected, ParkVisitInfo::Admin { .. }) => Err(MapCompositionError::RoleMismatch {
            park_id: status.id.get(),
            expected,
            found: Role::Admin,
        }),
        (expected, ParkVisitInfo::User { .. }) => Err(MapCompositionError::RoleMismatch {
            park_id: status.id.get(),
            expected,
            found: Role::User,
        }),
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ParkId;
    use crate::domain::ports::empty_collection;
    use chrono::NaiveDate;
    use geojson::{Feature, Geometry, Value};
    use rstest::{fixture, rstest};

    fn status(id: i32, name: &str, visit: ParkVisitInfo) -> ParkStatus {
        ParkStatus {
            id: ParkId::new(id).expect("valid id"),
            name: name.to_owned(),
            centroid: Centroid::new(45.0, 15.5).expect("valid centroid"),
            visit,
        }
    }

    fn square(name: &str) -> Feature {
        let ring = vec![
            vec![15.0, 45.0],
            vec![15.1, 45.0],
            vec![15.1, 45.1],
            vec![15.0, 45.1],
            vec![15.0, 45.0],
        ];
        let mut properties = serde_json::Map::new();
        properties.insert(NAME_PROPERTY.to_owned(), name.into());
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    #[fixture]
    fn regions() -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: vec![square("Zagreb County")],
            foreign_members: None,
        }
    }

    #[rstest]
    fn viewport_uses_fixed_camera() {
        let map = compose_map(empty_collection(), empty_collection(), &[], Role::User)
            .expect("empty map composes");
        assert_eq!(map.viewport.center.lat(), 44.5);
        assert_eq!(map.viewport.center.lon(), 16.0);
        assert_eq!(map.viewport.zoom, 7);
        assert_eq!(map.viewport.tiles, "CartoDB positron");
        assert_eq!((map.viewport.width_px, map.viewport.height_px), (1000, 600));
    }

    #[rstest]
    fn layers_follow_paint_order_and_skip_empty(regions: FeatureCollection) {
        let parks = FeatureCollection {
            bbox: None,
            features: vec![square("Maksimir")],
            foreign_members: None,
        };
        let map = compose_map(regions.clone(), parks, &[], Role::Admin).expect("composes");
        let kinds: Vec<_> = map.layers.iter().map(|layer| layer.kind).collect();
        assert_eq!(kinds, vec![LayerKind::Regions, LayerKind::Parks]);
        assert_eq!(map.layers[0].style.fill_color, "white");
        assert_eq!(map.layers[0].style.color, "#1001DF");
        assert_eq!(map.layers[1].style.fill_color, "orange");
        assert_eq!(map.layers[1].style.color, "#00000026");
        assert_eq!(map.layers[1].tooltip_field, "name");

        let regions_only =
            compose_map(regions, empty_collection(), &[], Role::Admin).expect("composes");
        assert_eq!(regions_only.layers.len(), 1);
    }

    #[rstest]
    #[case(3, MarkerColor::Blue, MarkerGlyph::Users, "Total visits recorded: <b>3</b>")]
    #[case(0, MarkerColor::Red, MarkerGlyph::Times, "Nobody has visited this park yet.")]
    fn admin_markers_encode_visit_count(
        #[case] count: i64,
        #[case] color: MarkerColor,
        #[case] glyph: MarkerGlyph,
        #[case] text: &str,
    ) {
        let info = ParkVisitInfo::admin(count).expect("non-negative");
        let rows = [status(1, "Maksimir", info)];
        let map = compose_map(empty_collection(), empty_collection(), &rows, Role::Admin)
            .expect("composes");
        let marker = &map.markers[0];
        assert_eq!(marker.icon.color, color);
        assert_eq!(marker.icon.icon, glyph);
        assert_eq!(marker.icon.prefix, "fa");
        assert_eq!(marker.popup.html, format!("<h5>Maksimir</h5>{text}"));
        assert_eq!(marker.popup.max_width_px, 300);
        assert!(map.unvisited.is_empty());
    }

    #[rstest]
    fn user_markers_collect_unvisited_in_row_order() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 17).expect("valid date");
        let rows = [
            status(3, "Bundek", ParkVisitInfo::user(None)),
            status(7, "Maksimir", ParkVisitInfo::user(Some(date))),
            status(2, "Zrinjevac", ParkVisitInfo::user(None)),
        ];
        let map = compose_map(empty_collection(), empty_collection(), &rows, Role::User)
            .expect("composes");

        assert_eq!(map.markers[1].icon.color, MarkerColor::Green);
        assert_eq!(map.markers[1].icon.icon, MarkerGlyph::Check);
        assert_eq!(
            map.markers[1].popup.html,
            "<h5>Maksimir</h5>You visited on 2025-05-17"
        );
        assert_eq!(
            map.markers[0].popup.html,
            "<h5>Bundek</h5>You have not visited this park yet."
        );
        let unvisited: Vec<_> = map.unvisited.iter().map(|p| p.id.get()).collect();
        assert_eq!(unvisited, vec![3, 2]);
    }

    #[rstest]
    fn popup_escapes_park_names_but_tooltip_keeps_them() {
        let rows = [status(1, "<Kamp & Co>", ParkVisitInfo::user(None))];
        let map = compose_map(empty_collection(), empty_collection(), &rows, Role::User)
            .expect("composes");
        assert!(map.markers[0].popup.html.starts_with("<h5>&lt;Kamp &amp; Co&gt;</h5>"));
        assert_eq!(map.markers[0].tooltip, "<Kamp & Co>");
    }

    #[rstest]
    #[case(Role::Admin, ParkVisitInfo::user(None))]
    #[case(Role::User, ParkVisitInfo::Admin { visit_count: 1 })]
    fn mismatched_rows_are_rejected(#[case] role: Role, #[case] info: ParkVisitInfo) {
        let rows = [status(9, "Jarun", info)];
        let err = compose_map(empty_collection(), empty_collection(), &rows, role)
            .expect_err("mismatch must fail");
        assert!(matches!(err, MapCompositionError::RoleMismatch { park_id: 9, .. }));
    }
}
