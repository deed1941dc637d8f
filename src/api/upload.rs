use std::path::Path;

use serde::Deserialize;
use tokio::task;
use uuid::Uuid;

use crate::error::ApiError;

use super::ApiClient;

/// Tamaño máximo aceptado para imágenes, igual al límite del panel de
/// configuración (500 KB).
const TAMANO_MAXIMO: u64 = 500_000;

#[derive(Debug, Deserialize)]
pub struct ArchivoSubido {
    pub url: String,
}

/// Sube un archivo al backend: multipart con los campos `file` y
/// `empresa_id`, autenticado con el token vigente. Devuelve la URL pública.
pub async fn subir_archivo(
    api: &ApiClient,
    ruta: &Path,
    empresa_id: Uuid,
) -> Result<ArchivoSubido, ApiError> {
    let nombre = ruta
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archivo".to_string());

    let ruta = ruta.to_path_buf();
    let bytes = task::spawn_blocking(move || std::fs::read(ruta))
        .await
        .map_err(|e| ApiError::Validacion(format!("Fallo interno leyendo el archivo: {e}")))?
        .map_err(|e| ApiError::Validacion(format!("No se pudo leer el archivo: {e}")))?;

    if bytes.len() as u64 > TAMANO_MAXIMO {
        return Err(ApiError::Validacion(
            "El archivo es demasiado grande. Máximo 500KB.".to_string(),
        ));
    }

    let parte = reqwest::multipart::Part::bytes(bytes).file_name(nombre);
    let formulario = reqwest::multipart::Form::new()
        .part("file", parte)
        .text("empresa_id", empresa_id.to_string());

    api.post_multipart("/upload", formulario).await
}
