// ============================================================================
// OPTIMIZATION SERVICE - Dispara el optimizador del backend
// ============================================================================
// POST /run-script con los filtros actuales. La respuesta es opaca:
// se loguea y nada del mapa depende de ella.
// ============================================================================

use gloo_net::http::Request;
use wasm_bindgen_futures::spawn_local;

use crate::models::RouteFilters;
use crate::services::api_client::{ApiClient, ApiError};

/// Lanzar el optimizador con los filtros dados
pub async fn run_optimization(
    api: &ApiClient,
    filters: &RouteFilters,
) -> Result<serde_json::Value, ApiError> {
    let url = api.url("/run-script");
    log::info!("🎯 Ejecutando optimizador ({:?}, {:?})", filters.cost_optimization, filters.fuel_type);

    let response = Request::post(&url)
        .json(filters)
        .map_err(|e| ApiError::Serialization(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(ApiError::Http {
            status: response.status(),
            status_text: response.status_text(),
        });
    }

    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

/// Versión "fire and forget" que usa el botón de aplicar filtros
pub fn spawn_optimization(filters: RouteFilters) {
    spawn_local(async move {
        let api = ApiClient::new();
        match run_optimization(&api, &filters).await {
            Ok(result) => log::info!("✅ Optimizador terminado: {}", result),
            Err(e) => log::error!("❌ Error running optimization: {}", e),
        }
    });
}

#[cfg(test)]
mod tests {
    use crate::models::{CostOptimization, RouteFilters, VehicleCapacity};

    #[test]
    fn request_body_is_camel_case() {
        let filters = RouteFilters {
            cost_optimization: CostOptimization::Lowest,
            vehicle_capacity: VehicleCapacity::Xlarge,
            ..RouteFilters::default()
        };
        let body = serde_json::to_value(&filters).unwrap();
        assert_eq!(body["costOptimization"], "lowest");
        assert_eq!(body["vehicleCapacity"], "xlarge");
        assert_eq!(body["fuelType"], "diesel");
        assert_eq!(body["avoidTraffic"], true);
        assert_eq!(body["timeWindows"], true);
        assert_eq!(body["lowCarbon"], false);
    }
}
