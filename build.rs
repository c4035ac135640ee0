use std::env;
use std::fs;
use std::path::Path;

// Variables que el crate lee con option_env! (ver src/config.rs)
const KNOWN_KEYS: &[&str] = &[
    "BACKEND_URL",
    "MAPBOX_ACCESS_TOKEN",
    "DIRECTIONS_BASE_URL",
    "ROUTES_CSV_PATH",
    "VEHICLES_CSV_PATH",
    "DEPOT_LAT",
    "DEPOT_LNG",
    "DRIVER_ID",
    "ENABLE_LOGGING",
];

fn main() {
    // Cargar variables desde .env si existe
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    if !KNOWN_KEYS.contains(&key) {
                        println!("cargo:warning=Variable desconocida en .env: {}", key);
                    }

                    // El entorno del proceso tiene prioridad sobre .env
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    } else {
        println!("cargo:warning=No .env file found. MAPBOX_ACCESS_TOKEN vacío: el mapa mostrará el aviso de token.");
    }

    for key in KNOWN_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
