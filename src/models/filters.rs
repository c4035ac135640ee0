// ============================================================================
// FILTERS - Preferencias de ruta del panel de filtros
// ============================================================================
// Se serializa en camelCase: es el cuerpo que recibe POST /run-script
// ============================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CostOptimization {
    Lowest,
    #[default]
    Balanced,
    Fastest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Electric,
    Hybrid,
    #[default]
    Diesel,
    Gasoline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCapacity {
    Small,
    #[default]
    Medium,
    Large,
    Xlarge,
}

/// Opción de un desplegable del panel de filtros
pub trait FilterOption: Copy + PartialEq + 'static {
    fn all() -> &'static [Self];
    /// Valor serializado (el mismo que usa serde)
    fn key(&self) -> &'static str;
    fn label(&self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|option| option.key() == key)
    }
}

impl FilterOption for CostOptimization {
    fn all() -> &'static [Self] {
        &[CostOptimization::Lowest, CostOptimization::Balanced, CostOptimization::Fastest]
    }

    fn key(&self) -> &'static str {
        match self {
            CostOptimization::Lowest => "lowest",
            CostOptimization::Balanced => "balanced",
            CostOptimization::Fastest => "fastest",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CostOptimization::Lowest => "Lowest Cost",
            CostOptimization::Balanced => "Balanced",
            CostOptimization::Fastest => "Fastest Route",
        }
    }
}

impl FilterOption for FuelType {
    fn all() -> &'static [Self] {
        &[FuelType::Electric, FuelType::Hybrid, FuelType::Diesel, FuelType::Gasoline]
    }

    fn key(&self) -> &'static str {
        match self {
            FuelType::Electric => "electric",
            FuelType::Hybrid => "hybrid",
            FuelType::Diesel => "diesel",
            FuelType::Gasoline => "gasoline",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
            FuelType::Diesel => "Diesel",
            FuelType::Gasoline => "Gasoline",
        }
    }
}

impl FilterOption for VehicleCapacity {
    fn all() -> &'static [Self] {
        &[
            VehicleCapacity::Small,
            VehicleCapacity::Medium,
            VehicleCapacity::Large,
            VehicleCapacity::Xlarge,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            VehicleCapacity::Small => "small",
            VehicleCapacity::Medium => "medium",
            VehicleCapacity::Large => "large",
            VehicleCapacity::Xlarge => "xlarge",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            VehicleCapacity::Small => "Small (up to 1t)",
            VehicleCapacity::Medium => "Medium (1-3t)",
            VehicleCapacity::Large => "Large (3-7t)",
            VehicleCapacity::Xlarge => "Extra Large (7t+)",
        }
    }
}

/// Estado completo del panel de filtros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteFilters {
    // Medioambientales
    pub low_carbon: bool,
    pub ev_priority: bool,
    pub emission_zones: bool,
    // Económicos
    pub cost_optimization: CostOptimization,
    pub avoid_tolls: bool,
    pub fuel_efficiency: bool,
    // Vehículo
    pub fuel_type: FuelType,
    pub vehicle_capacity: VehicleCapacity,
    // Rendimiento
    pub avoid_traffic: bool,
    pub time_windows: bool,
}

impl Default for RouteFilters {
    fn default() -> Self {
        Self {
            low_carbon: false,
            ev_priority: false,
            emission_zones: false,
            cost_optimization: CostOptimization::Balanced,
            avoid_tolls: false,
            fuel_efficiency: false,
            fuel_type: FuelType::Diesel,
            vehicle_capacity: VehicleCapacity::Medium,
            avoid_traffic: true,
            time_windows: true,
        }
    }
}

impl RouteFilters {
    /// Subconjunto que consume el mapa de rutas
    pub fn route_preferences(&self) -> RoutePreferences {
        RoutePreferences {
            avoid_tolls: self.avoid_tolls,
            avoid_traffic: self.avoid_traffic,
            low_carbon: self.low_carbon,
            ev_priority: self.ev_priority,
        }
    }
}

/// Preferencias que el planificador pasa al mapa (solo lectura)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePreferences {
    pub avoid_tolls: bool,
    pub avoid_traffic: bool,
    pub low_carbon: bool,
    pub ev_priority: bool,
}

impl Default for RoutePreferences {
    fn default() -> Self {
        RouteFilters::default().route_preferences()
    }
}

impl RoutePreferences {
    /// Parámetro `exclude` de la API de Directions
    pub fn exclusions(&self) -> Vec<Exclusion> {
        let mut exclusions = Vec::new();
        if self.avoid_tolls {
            exclusions.push(Exclusion::Toll);
        }
        exclusions
    }

    /// true si el cambio obliga a volver a pedir geometría
    pub fn geometry_changed(&self, other: &RoutePreferences) -> bool {
        self.exclusions() != other.exclusions()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exclusion {
    Toll,
}

impl Exclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exclusion::Toll => "toll",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_script_body_uses_camel_case() {
        let json = serde_json::to_value(RouteFilters::default()).unwrap();
        assert_eq!(json["lowCarbon"], false);
        assert_eq!(json["avoidTraffic"], true);
        assert_eq!(json["costOptimization"], "balanced");
        assert_eq!(json["fuelType"], "diesel");
        assert_eq!(json["vehicleCapacity"], "medium");
        assert_eq!(json["timeWindows"], true);
    }

    #[test]
    fn option_keys_match_serde_names() {
        for option in FuelType::all() {
            assert_eq!(serde_json::to_value(option).unwrap(), option.key());
            assert_eq!(FuelType::from_key(option.key()), Some(*option));
        }
        for option in VehicleCapacity::all() {
            assert_eq!(serde_json::to_value(option).unwrap(), option.key());
        }
        for option in CostOptimization::all() {
            assert_eq!(serde_json::to_value(option).unwrap(), option.key());
        }
        assert_eq!(CostOptimization::from_key("cheapest"), None);
    }

    #[test]
    fn only_tolls_produce_exclusions() {
        let mut prefs = RoutePreferences::default();
        assert!(prefs.exclusions().is_empty());
        prefs.avoid_traffic = false;
        prefs.low_carbon = true;
        assert!(prefs.exclusions().is_empty());
        prefs.avoid_tolls = true;
        assert_eq!(prefs.exclusions(), vec![Exclusion::Toll]);
    }

    #[test]
    fn low_carbon_does_not_require_new_geometry() {
        let before = RoutePreferences::default();
        let after = RoutePreferences { low_carbon: true, ..before };
        assert!(!before.geometry_changed(&after));
        let tolls = RoutePreferences { avoid_tolls: true, ..before };
        assert!(before.geometry_changed(&tolls));
    }
}
