// ============================================================================
// ROUTE CSV - Parseo de routes_solution.csv y delivery_vehicles.csv
// ============================================================================
// Filas mal formadas se descartan en silencio; nunca es un error fatal
// ============================================================================

use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::models::LngLat;

/// Waypoints de un vehículo en orden de fichero
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRoute {
    pub vehicle_id: String,
    pub waypoints: Vec<LngLat>,
    pub vehicle_type: Option<String>,
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(strip_bom(text).as_bytes())
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw?.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parsea el CSV de rutas (`vehicle_id, lat, lon[, vehicle_type]`).
/// Los vehículos salen en orden de primera aparición.
pub fn parse_routes_csv(text: &str) -> Vec<ParsedRoute> {
    let mut reader = reader(text);
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            log::warn!("⚠️ CSV de rutas sin cabecera legible: {}", e);
            return Vec::new();
        }
    };

    let (Some(vid_idx), Some(lat_idx), Some(lon_idx)) = (
        column(&headers, "vehicle_id"),
        column(&headers, "lat"),
        column(&headers, "lon"),
    ) else {
        log::warn!("⚠️ CSV de rutas sin columnas vehicle_id/lat/lon: {:?}", headers);
        return Vec::new();
    };
    let type_idx = column(&headers, "vehicle_type");

    let mut routes: Vec<ParsedRoute> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in reader.records() {
        let Ok(record) = record else { continue };

        let vehicle_id = match record.get(vid_idx) {
            Some(id) if !id.is_empty() => id,
            _ => continue,
        };
        let (Some(lat), Some(lon)) = (
            parse_coordinate(record.get(lat_idx)),
            parse_coordinate(record.get(lon_idx)),
        ) else {
            continue;
        };
        let vehicle_type = type_idx
            .and_then(|idx| record.get(idx))
            .filter(|t| !t.is_empty());

        let position = *positions.entry(vehicle_id.to_string()).or_insert_with(|| {
            routes.push(ParsedRoute {
                vehicle_id: vehicle_id.to_string(),
                waypoints: Vec::new(),
                vehicle_type: None,
            });
            routes.len() - 1
        });

        let route = &mut routes[position];
        // Gana el primer tipo no vacío
        if route.vehicle_type.is_none() {
            route.vehicle_type = vehicle_type.map(str::to_string);
        }
        route.waypoints.push([lon, lat]);
    }

    routes
}

/// Parsea delivery_vehicles.csv (`vehicle_id, type, ...`) a un mapa id → tipo
pub fn parse_vehicle_types_csv(text: &str) -> HashMap<String, String> {
    let mut types = HashMap::new();
    let mut reader = reader(text);
    let Ok(headers) = reader.headers().cloned() else {
        return types;
    };
    let (Some(id_idx), Some(type_idx)) = (column(&headers, "vehicle_id"), column(&headers, "type")) else {
        log::warn!("⚠️ delivery_vehicles.csv sin columnas vehicle_id/type");
        return types;
    };

    for record in reader.records().flatten() {
        if let (Some(id), Some(vehicle_type)) = (record.get(id_idx), record.get(type_idx)) {
            if !id.is_empty() && !vehicle_type.is_empty() {
                types.insert(id.to_string(), vehicle_type.to_string());
            }
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_vehicles_keep_file_order() {
        let csv = "vehicle_id,lat,lon\n\
                   V1,46.05,14.45\n\
                   V2,46.06,14.46\n\
                   V1,46.07,14.47\n\
                   V2,46.05,14.45\n\
                   V1,46.05,14.45\n";
        let routes = parse_routes_csv(csv);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].vehicle_id, "V1");
        assert_eq!(routes[0].waypoints.len(), 3);
        assert_eq!(routes[0].waypoints[1], [14.47, 46.07]);
        assert_eq!(routes[1].vehicle_id, "V2");
        assert_eq!(routes[1].waypoints.len(), 2);
    }

    #[test]
    fn malformed_rows_are_dropped() {
        let csv = "vehicle_id,lat,lon\n\
                   V1,abc,14.45\n\
                   ,46.0,14.0\n\
                   V1,46.0\n\
                   V1,46.1,not-a-number\n\
                   V1,46.2,14.2\n";
        let routes = parse_routes_csv(csv);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].waypoints, vec![[14.2, 46.2]]);
    }

    #[test]
    fn first_non_empty_type_wins() {
        let csv = "vehicle_id,lat,lon,vehicle_type\n\
                   V1,46.0,14.0,\n\
                   V1,46.1,14.1,bike\n\
                   V1,46.2,14.2,car\n";
        let routes = parse_routes_csv(csv);
        assert_eq!(routes[0].vehicle_type.as_deref(), Some("bike"));
    }

    #[test]
    fn columns_are_found_by_name_and_bom_is_ignored() {
        let csv = "\u{feff}lon, lat ,vehicle_id\r\n14.0,46.0,V9\r\n\r\n14.1,46.1,V9\r\n";
        let routes = parse_routes_csv(csv);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].vehicle_id, "V9");
        assert_eq!(routes[0].waypoints, vec![[14.0, 46.0], [14.1, 46.1]]);
    }

    #[test]
    fn missing_columns_yield_nothing() {
        assert!(parse_routes_csv("id,x,y\nV1,1,2\n").is_empty());
        assert!(parse_routes_csv("").is_empty());
    }

    #[test]
    fn vehicle_metadata_lookup() {
        let csv = "\u{feff}vehicle_id,type,max_capacity_kg\nV3,electric,500\nV4,diesel,1200\nV5,,800\n";
        let types = parse_vehicle_types_csv(csv);
        assert_eq!(types.len(), 2);
        assert_eq!(types["V3"], "electric");
        assert_eq!(types["V4"], "diesel");
        assert!(!types.contains_key("V5"));
    }
}
