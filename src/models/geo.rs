use serde::{Deserialize, Serialize};

/// Punto en formato Mapbox: `[longitude, latitude]`
pub type LngLat = [f64; 2];

/// Rectángulo envolvente en grados (lon/lat)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: LngLat,
    pub max: LngLat,
}

impl Bounds {
    pub fn from_point(point: LngLat) -> Self {
        Self { min: point, max: point }
    }

    /// None si no hay puntos
    pub fn from_points(points: &[LngLat]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::from_point(*first);
        for point in rest {
            bounds.extend(*point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LngLat) {
        self.min[0] = self.min[0].min(point[0]);
        self.min[1] = self.min[1].min(point[1]);
        self.max[0] = self.max[0].max(point[0]);
        self.max[1] = self.max[1].max(point[1]);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut merged = *self;
        merged.extend(other.min);
        merged.extend(other.max);
        merged
    }

    /// Formato que espera `fitBounds`: `[[minLng, minLat], [maxLng, maxLat]]`
    pub fn to_array(&self) -> [LngLat; 2] {
        [self.min, self.max]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_all_points() {
        let bounds = Bounds::from_points(&[[14.5, 46.0], [14.4, 46.1], [14.6, 45.9]]).unwrap();
        assert_eq!(bounds.min, [14.4, 45.9]);
        assert_eq!(bounds.max, [14.6, 46.1]);
    }

    #[test]
    fn no_points_no_bounds() {
        assert_eq!(Bounds::from_points(&[]), None);
    }

    #[test]
    fn union_of_disjoint_boxes() {
        let a = Bounds::from_point([1.0, 1.0]);
        let b = Bounds::from_point([3.0, -2.0]);
        let merged = a.union(&b);
        assert_eq!(merged.to_array(), [[1.0, -2.0], [3.0, 1.0]]);
    }
}
