use serde::{Deserialize, Serialize};

use super::geo::LngLat;
use super::order::Order;

/// Número de pedidos que se asignan al conductor en la vista de conductor
pub const DRIVER_DELIVERY_LIMIT: usize = 8;
/// Kilos por bulto al estimar el número de paquetes
const KG_PER_PACKAGE: f64 = 5.0;
const DEFAULT_CITY: &str = "Ljubljana";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Completed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Completed => "completed",
        }
    }
}

/// Entrega asignada al conductor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDelivery {
    pub id: String,
    pub order_id: String,
    pub address: String,
    pub packages: u32,
    pub status: DeliveryStatus,
    pub time: String,
    pub coordinates: LngLat,
    pub sequence_number: usize,
}

impl DriverDelivery {
    fn from_order(order: &Order, coordinates: LngLat, index: usize) -> Self {
        let city = order
            .city
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY);
        Self {
            id: format!("DEL-{}", index + 1),
            order_id: order.order_id.clone(),
            address: format!("{} {}, {}", order.street, order.house_number, city),
            packages: (order.weight / KG_PER_PACKAGE).ceil().max(0.0) as u32,
            status: DeliveryStatus::Pending,
            time: order.window_start.clone(),
            coordinates,
            sequence_number: index + 1,
        }
    }
}

/// Ruta del conductor: lista ordenada de entregas activas
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DriverRoute {
    pub driver_id: String,
    pub deliveries: Vec<DriverDelivery>,
}

impl DriverRoute {
    /// Toma los primeros `limit` pedidos geocodificados
    pub fn from_orders(driver_id: &str, orders: &[Order], limit: usize) -> Self {
        let deliveries = orders
            .iter()
            .filter_map(|order| order.coordinates().map(|coords| (order, coords)))
            .take(limit)
            .enumerate()
            .map(|(index, (order, coords))| DriverDelivery::from_order(order, coords, index))
            .collect();
        Self {
            driver_id: driver_id.to_string(),
            deliveries,
        }
    }

    /// Marca la entrega como completada: sale de la lista activa.
    /// Devuelve false si no existía o ya no estaba pendiente.
    pub fn complete(&mut self, delivery_id: &str) -> bool {
        let before = self.deliveries.len();
        self.deliveries
            .retain(|d| !(d.id == delivery_id && d.status == DeliveryStatus::Pending));
        self.deliveries.len() != before
    }

    pub fn pending_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.status == DeliveryStatus::Pending)
            .count()
    }

    pub fn completed_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.status == DeliveryStatus::Completed)
            .count()
    }

    pub fn get(&self, delivery_id: &str) -> Option<&DriverDelivery> {
        self.deliveries.iter().find(|d| d.id == delivery_id)
    }
}
