use serde::{Deserialize, Serialize};

/// Vehículo tal como lo devuelve `GET /vehicles/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub max_capacity_kg: f64,
    pub fuel_type: String,
    pub emission_g_co2_per_km: f64,
}

impl Vehicle {
    pub fn is_electric(&self) -> bool {
        self.fuel_type == "electric"
    }
}

/// Tipos que cuentan como bajas emisiones en el filtro "Low Carbon"
pub const LOW_CARBON_TYPES: &[&str] = &["electric", "bike"];

pub fn is_low_carbon_type(vehicle_type: &str) -> bool {
    LOW_CARBON_TYPES.contains(&vehicle_type)
}
