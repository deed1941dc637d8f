use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const ARCHIVO_SESION: &str = "sesion.json";

/// Token vigente y si el usuario pidió recordarlo entre ejecuciones.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenGuardado {
    token: String,
    recordar: bool,
}

/// Sesión del usuario con ciclo de vida explícito: se hidrata al arrancar,
/// se establece al iniciar sesión y se limpia al cerrarla o ante un 401.
///
/// Con `recordar` el token persiste en disco; sin él vive solo lo que dure
/// el proceso.
#[derive(Debug)]
pub struct Sesion {
    ruta: PathBuf,
    actual: Mutex<Option<TokenGuardado>>,
}

impl Sesion {
    /// Carga la sesión persistida en `data_dir`, si existe.
    pub fn hidratar(data_dir: &Path) -> Self {
        let ruta = data_dir.join(ARCHIVO_SESION);
        let actual = match fs::read_to_string(&ruta) {
            Ok(contenido) => match serde_json::from_str::<TokenGuardado>(&contenido) {
                Ok(guardado) => {
                    debug!("Sesión hidratada desde {}", ruta.display());
                    Some(guardado)
                }
                Err(e) => {
                    warn!("Archivo de sesión corrupto, se ignora: {e}");
                    None
                }
            },
            Err(_) => None,
        };
        Sesion {
            ruta,
            actual: Mutex::new(actual),
        }
    }

    /// Sesión solo en memoria, sin tocar disco. Útil en pruebas.
    pub fn en_memoria() -> Self {
        Sesion {
            ruta: PathBuf::new(),
            actual: Mutex::new(None),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.actual
            .lock()
            .expect("lock de sesión envenenado")
            .as_ref()
            .map(|g| g.token.clone())
    }

    pub fn activa(&self) -> bool {
        self.token().is_some()
    }

    /// Guarda un token recién emitido. Con `recordar` lo persiste; sin él
    /// elimina cualquier copia en disco de una sesión anterior.
    pub fn establecer(&self, token: String, recordar: bool) {
        let guardado = TokenGuardado { token, recordar };
        if recordar {
            self.persistir(&guardado);
        } else {
            self.borrar_archivo();
        }
        *self.actual.lock().expect("lock de sesión envenenado") = Some(guardado);
    }

    /// Olvida el token en memoria y en disco. Idempotente: un aluvión de
    /// 401 simultáneos limpia una sola vez y nunca entra en bucle.
    pub fn limpiar(&self) {
        let mut actual = self.actual.lock().expect("lock de sesión envenenado");
        if actual.take().is_some() {
            debug!("Sesión limpiada");
        }
        drop(actual);
        self.borrar_archivo();
    }

    fn persistir(&self, guardado: &TokenGuardado) {
        if self.ruta.as_os_str().is_empty() {
            return;
        }
        if let Some(padre) = self.ruta.parent() {
            if let Err(e) = fs::create_dir_all(padre) {
                warn!("No se pudo crear {}: {e}", padre.display());
                return;
            }
        }
        match serde_json::to_string_pretty(guardado) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.ruta, json) {
                    warn!("No se pudo guardar la sesión: {e}");
                }
            }
            Err(e) => warn!("No se pudo serializar la sesión: {e}"),
        }
    }

    fn borrar_archivo(&self) {
        if !self.ruta.as_os_str().is_empty() {
            let _ = fs::remove_file(&self.ruta);
        }
    }
}
