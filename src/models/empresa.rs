use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Empresa {
    pub id: Uuid,
    pub nombre: String,
    pub direccion: String,
    pub telefono: Option<String>,
    pub ciudad: String,
    pub email: String,
    pub postal_code: Option<String>,
    pub pais: Option<String>,
    pub tasa_impositiva: Option<String>,
    pub fecha_fundacion: Option<DateTime<Utc>>,
    pub sitio_web: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmpresaCreate {
    pub nombre: String,
    pub direccion: String,
    pub telefono: Option<String>,
    pub ciudad: String,
    pub email: String,
    pub postal_code: Option<String>,
    pub pais: Option<String>,
    pub tasa_impositiva: Option<String>,
    pub fecha_fundacion: Option<DateTime<Utc>>,
    pub sitio_web: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EmpresaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ciudad: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pais: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasa_impositiva: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_fundacion: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sitio_web: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmpresasPublic {
    pub data: Vec<Empresa>,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Restaurante {
    pub id: Uuid,
    pub nombre: String,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub empresa_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RestauranteCreate {
    pub nombre: String,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub empresa_id: Uuid,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RestauranteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresa_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RestaurantesPublic {
    pub data: Vec<Restaurante>,
    pub count: i64,
}
