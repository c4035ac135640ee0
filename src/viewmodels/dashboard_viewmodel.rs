//! Métricas de la página de inicio del manager.

use crate::models::{Order, Vehicle};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardMetrics {
    pub total_vehicles: usize,
    pub electric_vehicles: usize,
    pub total_orders: usize,
    pub express_orders: usize,
    /// g CO₂/km, redondeado
    pub avg_emissions: u32,
    pub electric_percentage: u32,
    /// Toneladas
    pub total_capacity_t: f64,
}

impl DashboardMetrics {
    pub fn compute(orders: &[Order], vehicles: &[Vehicle]) -> Self {
        let total_vehicles = vehicles.len();
        let electric_vehicles = vehicles.iter().filter(|v| v.is_electric()).count();
        let (avg_emissions, electric_percentage) = if total_vehicles == 0 {
            (0, 0)
        } else {
            let total_emissions: f64 = vehicles.iter().map(|v| v.emission_g_co2_per_km).sum();
            (
                (total_emissions / total_vehicles as f64).round() as u32,
                (electric_vehicles as f64 * 100.0 / total_vehicles as f64).round() as u32,
            )
        };

        Self {
            total_vehicles,
            electric_vehicles,
            total_orders: orders.len(),
            express_orders: orders.iter().filter(|o| o.is_express()).count(),
            avg_emissions,
            electric_percentage,
            total_capacity_t: vehicles.iter().map(|v| v.max_capacity_kg).sum::<f64>() / 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(fuel: &str, emission: f64, capacity: f64) -> Vehicle {
        Vehicle {
            vehicle_id: "V".to_string(),
            vehicle_type: "van".to_string(),
            max_capacity_kg: capacity,
            fuel_type: fuel.to_string(),
            emission_g_co2_per_km: emission,
        }
    }

    fn order(priority: &str) -> Order {
        Order {
            order_id: "O1".to_string(),
            weight: 1.0,
            priority: priority.to_string(),
            window_start: "08:00".to_string(),
            window_end: "10:00".to_string(),
            street: "Trubarjeva".to_string(),
            house_number: "1".to_string(),
            postal_code: None,
            city: None,
            latitude: None,
            longitude: None,
            status: "pending".to_string(),
        }
    }

    #[test]
    fn empty_inputs_give_zeroes() {
        assert_eq!(DashboardMetrics::compute(&[], &[]), DashboardMetrics::default());
    }

    #[test]
    fn metrics_from_fleet_and_orders() {
        let vehicles = vec![
            vehicle("electric", 0.0, 500.0),
            vehicle("diesel", 180.0, 1200.0),
            vehicle("diesel", 121.0, 800.0),
        ];
        let orders = vec![order("express"), order("standard")];
        let m = DashboardMetrics::compute(&orders, &vehicles);
        assert_eq!(m.total_vehicles, 3);
        assert_eq!(m.electric_vehicles, 1);
        assert_eq!(m.electric_percentage, 33);
        assert_eq!(m.avg_emissions, 100);
        assert_eq!(m.total_orders, 2);
        assert_eq!(m.express_orders, 1);
        assert!((m.total_capacity_t - 2.5).abs() < 1e-9);
    }
}
