use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    TasaImpositiva, TasaImpositivaCreate, TasasImpositivasPublic, TasaImpositivaUpdate,
};

use super::{consulta, ApiClient, Confirmacion};

pub async fn listar(
    api: &ApiClient,
    skip: u32,
    limit: u32,
) -> Result<TasasImpositivasPublic, ApiError> {
    let params = consulta(&[
        ("skip", Some(skip.to_string())),
        ("limit", Some(limit.to_string())),
    ]);
    api.get("/tasas-impositivas", &params).await
}

pub async fn obtener(api: &ApiClient, id: Uuid) -> Result<TasaImpositiva, ApiError> {
    api.get(&format!("/tasas-impositivas/{id}"), &[]).await
}

pub async fn crear(
    api: &ApiClient,
    datos: &TasaImpositivaCreate,
) -> Result<TasaImpositiva, ApiError> {
    api.post("/tasas-impositivas", datos).await
}

pub async fn actualizar(
    api: &ApiClient,
    id: Uuid,
    cambios: &TasaImpositivaUpdate,
) -> Result<TasaImpositiva, ApiError> {
    api.patch(&format!("/tasas-impositivas/{id}"), cambios).await
}

pub async fn eliminar(api: &ApiClient, id: Uuid) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/tasas-impositivas/{id}")).await
}
