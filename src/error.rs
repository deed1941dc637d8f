use thiserror::Error;

/// Error único que ve todo consumidor del cliente HTTP.
///
/// Quien llama nunca recibe un error crudo del transporte. Fallos de red,
/// timeouts y respuestas no-2xx llegan normalizados aquí, con un estado
/// HTTP y, si el backend lo envió, su cuerpo ya interpretado.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Fallo de transporte antes de recibir respuesta (DNS, conexión caída).
    #[error("Error de red: {0}")]
    Red(String),

    /// El servidor no respondió dentro del tiempo configurado.
    #[error("Tiempo de espera agotado")]
    TiempoAgotado,

    /// Respuesta no-2xx con el estado y el cuerpo que envió el backend.
    #[error("HTTP {estado}: {mensaje}")]
    Http {
        estado: u16,
        mensaje: String,
        cuerpo: Option<serde_json::Value>,
    },

    /// Un 401 en una llamada autenticada: el token guardado ya fue limpiado.
    #[error("Sesión expirada, vuelve a iniciar sesión")]
    SesionExpirada,

    /// La respuesta llegó 2xx pero no tiene la forma esperada.
    #[error("Respuesta inválida del servidor: {0}")]
    RespuestaInvalida(String),

    /// Validación local que se detecta antes de tocar la red.
    #[error("{0}")]
    Validacion(String),
}

impl ApiError {
    /// Estado HTTP equivalente: 0 para fallos de red, 408 para timeout.
    pub fn estado(&self) -> u16 {
        match self {
            ApiError::Red(_) => 0,
            ApiError::TiempoAgotado => 408,
            ApiError::Http { estado, .. } => *estado,
            ApiError::SesionExpirada => 401,
            ApiError::RespuestaInvalida(_) => 500,
            ApiError::Validacion(_) => 400,
        }
    }

    /// Un error transitorio puede reintentarse sin riesgo de duplicar
    /// efectos: el servidor nunca llegó a responder.
    pub fn es_transitorio(&self) -> bool {
        matches!(self, ApiError::Red(_) | ApiError::TiempoAgotado)
    }

    pub(crate) fn desde_reqwest(err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::TiempoAgotado
        } else if err.is_decode() {
            ApiError::RespuestaInvalida(err.to_string())
        } else {
            ApiError::Red(err.to_string())
        }
    }
}
