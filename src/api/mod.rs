use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::sesion::Sesion;

pub mod auth;
pub mod empresas;
pub mod mesas;
pub mod ordenes;
pub mod productos;
pub mod tasas;
pub mod upload;
pub mod usuarios;

/// Respuesta estándar de los DELETE del backend.
#[derive(Debug, Deserialize)]
pub struct Confirmacion {
    pub ok: bool,
}

/// Cliente HTTP único de la aplicación.
///
/// Adjunta el token de la sesión, serializa cuerpos JSON y normaliza toda
/// falla en [`ApiError`]. Un 401 en una llamada autenticada limpia la
/// sesión antes de devolver [`ApiError::SesionExpirada`].
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
    sesion: Arc<Sesion>,
}

impl ApiClient {
    pub fn nuevo(config: &Config, sesion: Arc<Sesion>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Red(format!("No se pudo crear el cliente HTTP: {e}")))?;
        Ok(ApiClient {
            http,
            base: config.api_url.trim_end_matches('/').to_string(),
            sesion,
        })
    }

    pub fn sesion(&self) -> &Sesion {
        &self.sesion
    }

    fn url(&self, ruta: &str) -> String {
        format!("{}{}", self.base, ruta)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        ruta: &str,
        consulta: &[(String, String)],
    ) -> Result<T, ApiError> {
        let peticion = self.http.get(self.url(ruta)).query(consulta);
        self.ejecutar(peticion, true).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        ruta: &str,
        cuerpo: &B,
    ) -> Result<T, ApiError> {
        let peticion = self.http.post(self.url(ruta)).json(cuerpo);
        self.ejecutar(peticion, true).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        ruta: &str,
        cuerpo: &B,
    ) -> Result<T, ApiError> {
        let peticion = self.http.patch(self.url(ruta)).json(cuerpo);
        self.ejecutar(peticion, true).await
    }

    /// PATCH sin cuerpo, con parámetros en la URL. Algunos endpoints de
    /// mesas (`asignar-orden`, `liberar`, `estado`) funcionan así.
    pub async fn patch_consulta<T: DeserializeOwned>(
        &self,
        ruta: &str,
        consulta: &[(String, String)],
    ) -> Result<T, ApiError> {
        let peticion = self.http.patch(self.url(ruta)).query(consulta);
        self.ejecutar(peticion, true).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, ruta: &str) -> Result<T, ApiError> {
        let peticion = self.http.delete(self.url(ruta));
        self.ejecutar(peticion, true).await
    }

    /// POST `application/x-www-form-urlencoded`, como exige el login OAuth2.
    pub async fn post_formulario<T: DeserializeOwned>(
        &self,
        ruta: &str,
        campos: &[(&str, &str)],
        con_auth: bool,
    ) -> Result<T, ApiError> {
        let peticion = self.http.post(self.url(ruta)).form(campos);
        self.ejecutar(peticion, con_auth).await
    }

    /// POST multipart para subidas de archivos, con un timeout más holgado.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        ruta: &str,
        formulario: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let peticion = self
            .http
            .post(self.url(ruta))
            .multipart(formulario)
            .timeout(std::time::Duration::from_secs(120));
        self.ejecutar(peticion, true).await
    }

    async fn ejecutar<T: DeserializeOwned>(
        &self,
        peticion: RequestBuilder,
        con_auth: bool,
    ) -> Result<T, ApiError> {
        let peticion = if con_auth {
            match self.sesion.token() {
                Some(token) => peticion.bearer_auth(token),
                None => peticion,
            }
        } else {
            peticion
        };

        let respuesta = peticion.send().await.map_err(ApiError::desde_reqwest)?;
        let estado = respuesta.status();
        let texto = respuesta.text().await.map_err(ApiError::desde_reqwest)?;
        let cuerpo: Option<serde_json::Value> = serde_json::from_str(&texto).ok();

        if !estado.is_success() {
            if estado.as_u16() == 401 && con_auth {
                warn!("401 del backend: se limpia la sesión");
                self.sesion.limpiar();
                return Err(ApiError::SesionExpirada);
            }
            let mensaje = mensaje_del_backend(cuerpo.as_ref())
                .unwrap_or_else(|| format!("Error HTTP {}", estado.as_u16()));
            debug!("Respuesta {estado}: {mensaje}");
            return Err(ApiError::Http {
                estado: estado.as_u16(),
                mensaje,
                cuerpo,
            });
        }

        serde_json::from_str(&texto).map_err(|e| ApiError::RespuestaInvalida(e.to_string()))
    }
}

/// Mensaje legible del cuerpo de error, en el orden en que los backends
/// lo suelen poner: `message`, `error` o el `detail` de FastAPI.
fn mensaje_del_backend(cuerpo: Option<&serde_json::Value>) -> Option<String> {
    let cuerpo = cuerpo?;
    for clave in ["message", "error", "detail"] {
        if let Some(valor) = cuerpo.get(clave) {
            if let Some(texto) = valor.as_str() {
                return Some(texto.to_string());
            }
        }
    }
    None
}

/// Arma los parámetros de consulta descartando los ausentes.
pub(crate) fn consulta(parametros: &[(&str, Option<String>)]) -> Vec<(String, String)> {
    parametros
        .iter()
        .filter_map(|(clave, valor)| {
            valor
                .as_ref()
                .map(|v| ((*clave).to_string(), v.clone()))
        })
        .collect()
}
