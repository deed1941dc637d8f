use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

/// URL base del backend cuando `POS_API_URL` no está definida.
pub const API_URL_DEFAULT: &str = "http://localhost:8000/api/v1";

const TIMEOUT_SEGUNDOS_DEFAULT: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base de todas las rutas del backend, sin barra final.
    pub api_url: String,
    /// Tiempo máximo de espera por petición.
    pub timeout: Duration,
    /// Carpeta donde se guardan sesión, contexto y borradores.
    pub data_dir: PathBuf,
}

impl Config {
    /// Carga la configuración desde variables de entorno.
    pub fn desde_entorno() -> Self {
        let api_url = match env::var("POS_API_URL") {
            Ok(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => {
                info!("POS_API_URL no definida, usando {}", API_URL_DEFAULT);
                API_URL_DEFAULT.to_string()
            }
        };

        let segundos: u64 = cargar_o("POS_TIMEOUT_SEGUNDOS", TIMEOUT_SEGUNDOS_DEFAULT);

        let data_dir = env::var("COMANDERO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("comandero")
            });

        Config {
            api_url,
            timeout: Duration::from_secs(segundos),
            data_dir,
        }
    }
}

fn cargar_o<T>(clave: &str, defecto: T) -> T
where
    T: FromStr + Display + Copy,
    T::Err: Display,
{
    match env::var(clave) {
        Ok(valor) => valor.parse().unwrap_or_else(|e| {
            warn!("Valor inválido en {clave}: {e}; usando {defecto}");
            defecto
        }),
        Err(_) => defecto,
    }
}
