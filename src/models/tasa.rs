use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TasaImpositiva {
    pub id: Uuid,
    pub nombre: String,
    pub porcentaje: f64,
    pub descripcion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TasaImpositivaCreate {
    pub nombre: String,
    pub porcentaje: f64,
    pub descripcion: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TasaImpositivaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub porcentaje: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TasasImpositivasPublic {
    pub data: Vec<TasaImpositiva>,
    pub count: i64,
}
