//! Núcleo de cliente del punto de venta: sesión, cliente HTTP tipado,
//! borrador de órdenes por mesa y generación de comandas.
//!
//! El backend REST es el dueño de todo el estado; este crate solo sostiene
//! lo que vive entre "agregar producto" y "enviar comanda", y lo reconcilia
//! contra el servidor al enviar.

pub mod api;
pub mod borrador;
pub mod config;
pub mod error;
pub mod models;
pub mod printing;
pub mod servicio;
pub mod sesion;

use std::sync::Arc;

use api::ApiClient;
use config::Config;
use error::ApiError;
use sesion::Sesion;

/// La aplicación armada: configuración, sesión hidratada y cliente HTTP.
pub struct Comandero {
    config: Config,
    sesion: Arc<Sesion>,
    api: ApiClient,
}

impl Comandero {
    pub fn nuevo(config: Config) -> Result<Self, ApiError> {
        let sesion = Arc::new(Sesion::hidratar(&config.data_dir));
        let api = ApiClient::nuevo(&config, sesion.clone())?;
        Ok(Comandero {
            config,
            sesion,
            api,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sesion(&self) -> &Sesion {
        &self.sesion
    }
}
