use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    Empresa, EmpresaCreate, EmpresasPublic, EmpresaUpdate, Restaurante, RestauranteCreate,
    RestaurantesPublic, RestauranteUpdate,
};

use super::{consulta, ApiClient, Confirmacion};

fn paginacion(skip: u32, limit: u32) -> Vec<(String, String)> {
    consulta(&[
        ("skip", Some(skip.to_string())),
        ("limit", Some(limit.to_string())),
    ])
}

pub async fn listar(api: &ApiClient, skip: u32, limit: u32) -> Result<EmpresasPublic, ApiError> {
    api.get("/empresas", &paginacion(skip, limit)).await
}

pub async fn obtener(api: &ApiClient, id: Uuid) -> Result<Empresa, ApiError> {
    api.get(&format!("/empresas/{id}"), &[]).await
}

pub async fn crear(api: &ApiClient, datos: &EmpresaCreate) -> Result<Empresa, ApiError> {
    api.post("/empresas", datos).await
}

pub async fn actualizar(
    api: &ApiClient,
    id: Uuid,
    cambios: &EmpresaUpdate,
) -> Result<Empresa, ApiError> {
    api.patch(&format!("/empresas/{id}"), cambios).await
}

pub async fn eliminar(api: &ApiClient, id: Uuid) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/empresas/{id}")).await
}

/// Restaurantes visibles para el usuario autenticado.
pub async fn listar_restaurantes(
    api: &ApiClient,
    skip: u32,
    limit: u32,
) -> Result<RestaurantesPublic, ApiError> {
    api.get("/restaurantes", &paginacion(skip, limit)).await
}

pub async fn listar_restaurantes_de_empresa(
    api: &ApiClient,
    empresa_id: Uuid,
    skip: u32,
    limit: u32,
) -> Result<RestaurantesPublic, ApiError> {
    api.get(
        &format!("/restaurantes/empresa/{empresa_id}"),
        &paginacion(skip, limit),
    )
    .await
}

pub async fn obtener_restaurante(api: &ApiClient, id: Uuid) -> Result<Restaurante, ApiError> {
    api.get(&format!("/restaurantes/{id}"), &[]).await
}

pub async fn crear_restaurante(
    api: &ApiClient,
    datos: &RestauranteCreate,
) -> Result<Restaurante, ApiError> {
    api.post("/restaurantes", datos).await
}

pub async fn actualizar_restaurante(
    api: &ApiClient,
    id: Uuid,
    cambios: &RestauranteUpdate,
) -> Result<Restaurante, ApiError> {
    api.patch(&format!("/restaurantes/{id}"), cambios).await
}
