// ============================================================================
// DIRECTIONS SERVICE - Geometría por carretera (Mapbox Directions API)
// ============================================================================
// Máximo 25 coordenadas por petición. Sin reintentos: quien llama decide el fallback
// ============================================================================

use gloo_net::http::Request;
use serde::Deserialize;
use thiserror::Error;

use crate::config::CONFIG;
use crate::models::{Exclusion, LngLat};

/// Límite de coordenadas por petición de la API de Directions
pub const MAX_DIRECTIONS_WAYPOINTS: usize = 25;

#[derive(Debug, Error, PartialEq)]
pub enum DirectionsError {
    #[error("se necesitan al menos 2 waypoints (hay {0})")]
    TooFewWaypoints(usize),
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {0}")]
    Http(u16),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("respuesta sin rutas")]
    NoRoute,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    pub geometry: LineGeometry,
}

#[derive(Debug, Deserialize)]
pub struct LineGeometry {
    pub coordinates: Vec<LngLat>,
}

impl DirectionsResponse {
    /// Geometría de la primera ruta, si la hay
    pub fn into_geometry(self) -> Result<Vec<LngLat>, DirectionsError> {
        self.routes
            .into_iter()
            .next()
            .map(|route| route.geometry.coordinates)
            .filter(|coords| !coords.is_empty())
            .ok_or(DirectionsError::NoRoute)
    }
}

/// Fuente de geometría por carretera
#[allow(async_fn_in_trait)]
pub trait DirectionsProvider {
    /// `waypoints` ya respeta el límite de 25 puntos
    async fn fetch_geometry(
        &self,
        waypoints: &[LngLat],
        exclusions: &[Exclusion],
    ) -> Result<Vec<LngLat>, DirectionsError>;
}

/// Reduce una lista larga a ≤ 25 puntos conservando siempre el primero y el último.
/// Se queda con los índices múltiplos de `ceil(len / 24)`.
pub fn downsample_waypoints(waypoints: &[LngLat]) -> Vec<LngLat> {
    let len = waypoints.len();
    if len <= MAX_DIRECTIONS_WAYPOINTS {
        return waypoints.to_vec();
    }
    let step = len.div_ceil(MAX_DIRECTIONS_WAYPOINTS - 1);
    waypoints
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx == 0 || *idx == len - 1 || idx % step == 0)
        .map(|(_, point)| *point)
        .collect()
}

/// Parte una lista larga en tramos de ≤ 25 puntos que comparten el punto de unión
pub fn chunk_waypoints(waypoints: &[LngLat]) -> Vec<Vec<LngLat>> {
    if waypoints.len() <= MAX_DIRECTIONS_WAYPOINTS {
        return vec![waypoints.to_vec()];
    }
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < waypoints.len() - 1 {
        let end = (start + MAX_DIRECTIONS_WAYPOINTS).min(waypoints.len());
        chunks.push(waypoints[start..end].to_vec());
        start = end - 1;
    }
    chunks
}

/// Une las geometrías de los tramos sin duplicar los puntos de unión
pub fn stitch_segments(segments: Vec<Vec<LngLat>>) -> Vec<LngLat> {
    let mut stitched: Vec<LngLat> = Vec::new();
    for segment in segments {
        let skip = match (stitched.last(), segment.first()) {
            (Some(last), Some(first)) if last == first => 1,
            _ => 0,
        };
        stitched.extend(segment.into_iter().skip(skip));
    }
    stitched
}

/// URL de la API de Directions para una lista de coordenadas
pub fn build_directions_url(
    base_url: &str,
    waypoints: &[LngLat],
    access_token: &str,
    exclusions: &[Exclusion],
) -> String {
    let coordinates = waypoints
        .iter()
        .map(|[lng, lat]| format!("{},{}", lng, lat))
        .collect::<Vec<_>>()
        .join(";");
    let mut url = format!(
        "{}/{}?geometries=geojson&access_token={}&overview=full",
        base_url.trim_end_matches('/'),
        coordinates,
        access_token
    );
    if !exclusions.is_empty() {
        let exclude = exclusions
            .iter()
            .map(Exclusion::as_str)
            .collect::<Vec<_>>()
            .join(",");
        url.push_str("&exclude=");
        url.push_str(&exclude);
    }
    url
}

/// Cliente HTTP de la API de Directions de Mapbox
#[derive(Clone)]
pub struct MapboxDirections {
    base_url: String,
    access_token: String,
}

impl MapboxDirections {
    pub fn new(access_token: &str) -> Self {
        Self {
            base_url: CONFIG.map_config.directions_base_url.clone(),
            access_token: access_token.to_string(),
        }
    }
}

impl DirectionsProvider for MapboxDirections {
    async fn fetch_geometry(
        &self,
        waypoints: &[LngLat],
        exclusions: &[Exclusion],
    ) -> Result<Vec<LngLat>, DirectionsError> {
        if waypoints.len() < 2 {
            return Err(DirectionsError::TooFewWaypoints(waypoints.len()));
        }
        let url = build_directions_url(&self.base_url, waypoints, &self.access_token, exclusions);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| DirectionsError::Network(e.to_string()))?;
        if !response.ok() {
            return Err(DirectionsError::Http(response.status()));
        }
        response
            .json::<DirectionsResponse>()
            .await
            .map_err(|e| DirectionsError::Parse(e.to_string()))?
            .into_geometry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<LngLat> {
        (0..n).map(|i| [i as f64, i as f64 * 0.5]).collect()
    }

    #[test]
    fn thirty_waypoints_downsample_to_at_most_25() {
        let original = line(30);
        let sampled = downsample_waypoints(&original);
        assert!(sampled.len() <= MAX_DIRECTIONS_WAYPOINTS);
        assert_eq!(sampled.first(), original.first());
        assert_eq!(sampled.last(), original.last());
    }

    #[test]
    fn downsampling_bound_holds_for_many_lengths() {
        for n in 26..400 {
            let original = line(n);
            let sampled = downsample_waypoints(&original);
            assert!(sampled.len() <= MAX_DIRECTIONS_WAYPOINTS, "n={} -> {}", n, sampled.len());
            assert_eq!(sampled[0], original[0]);
            assert_eq!(sampled[sampled.len() - 1], original[n - 1]);
        }
    }

    #[test]
    fn short_lists_are_untouched() {
        let original = line(25);
        assert_eq!(downsample_waypoints(&original), original);
    }

    #[test]
    fn chunks_cover_every_waypoint() {
        let original = line(60);
        let chunks = chunk_waypoints(&original);
        assert!(chunks.iter().all(|c| c.len() <= MAX_DIRECTIONS_WAYPOINTS && c.len() >= 2));
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].last(), pair[1].first());
        }
        assert_eq!(stitch_segments(chunks), original);
    }

    #[test]
    fn chunking_does_not_leave_a_single_point_tail() {
        let original = line(49);
        let chunks = chunk_waypoints(&original);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].len(), 25);
    }

    #[test]
    fn url_carries_exclusions() {
        let url = build_directions_url(
            "https://api.mapbox.com/directions/v5/mapbox/driving/",
            &[[14.5, 46.05], [14.6, 46.1]],
            "pk.test",
            &[Exclusion::Toll],
        );
        assert_eq!(
            url,
            "https://api.mapbox.com/directions/v5/mapbox/driving/14.5,46.05;14.6,46.1\
             ?geometries=geojson&access_token=pk.test&overview=full&exclude=toll"
        );
        let plain = build_directions_url("https://x", &[[1.0, 2.0], [3.0, 4.0]], "t", &[]);
        assert!(!plain.contains("exclude"));
    }

    #[test]
    fn empty_routes_is_an_error() {
        let response: DirectionsResponse = serde_json::from_str(r#"{"routes":[]}"#).unwrap();
        assert_eq!(response.into_geometry(), Err(DirectionsError::NoRoute));

        let response: DirectionsResponse = serde_json::from_str(
            r#"{"routes":[{"geometry":{"type":"LineString","coordinates":[[1.0,2.0],[3.0,4.0]]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_geometry().unwrap(), vec![[1.0, 2.0], [3.0, 4.0]]);
    }
}
