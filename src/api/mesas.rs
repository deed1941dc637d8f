use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    EstadoMesa, MesaRestaurante, MesaRestauranteCreate, MesaRestaurantesPublic,
    MesaRestauranteUpdate,
};

use super::{consulta, ApiClient, Confirmacion};

pub async fn listar(
    api: &ApiClient,
    skip: u32,
    limit: u32,
) -> Result<MesaRestaurantesPublic, ApiError> {
    let params = consulta(&[
        ("skip", Some(skip.to_string())),
        ("limit", Some(limit.to_string())),
    ]);
    api.get("/mesas", &params).await
}

pub async fn listar_por_restaurante(
    api: &ApiClient,
    restaurante_id: Uuid,
    skip: u32,
    limit: u32,
) -> Result<MesaRestaurantesPublic, ApiError> {
    let params = consulta(&[
        ("skip", Some(skip.to_string())),
        ("limit", Some(limit.to_string())),
    ]);
    api.get(&format!("/mesas/restaurante/{restaurante_id}"), &params)
        .await
}

pub async fn obtener(api: &ApiClient, id: Uuid) -> Result<MesaRestaurante, ApiError> {
    api.get(&format!("/mesas/{id}"), &[]).await
}

pub async fn crear(
    api: &ApiClient,
    datos: &MesaRestauranteCreate,
) -> Result<MesaRestaurante, ApiError> {
    api.post("/mesas", datos).await
}

pub async fn actualizar(
    api: &ApiClient,
    id: Uuid,
    cambios: &MesaRestauranteUpdate,
) -> Result<MesaRestaurante, ApiError> {
    api.patch(&format!("/mesas/{id}"), cambios).await
}

/// Asigna una orden activa a la mesa y la marca ocupada.
pub async fn asignar_orden(
    api: &ApiClient,
    mesa_id: Uuid,
    orden_id: Uuid,
    numero_comensales: u32,
) -> Result<MesaRestaurante, ApiError> {
    let params = consulta(&[
        ("orden_id", Some(orden_id.to_string())),
        ("numero_comensales", Some(numero_comensales.to_string())),
    ]);
    api.patch_consulta(&format!("/mesas/{mesa_id}/asignar-orden"), &params)
        .await
}

/// Libera la mesa: quita la orden activa y vuelve a disponible.
pub async fn liberar(api: &ApiClient, mesa_id: Uuid) -> Result<MesaRestaurante, ApiError> {
    api.patch_consulta(&format!("/mesas/{mesa_id}/liberar"), &[])
        .await
}

pub async fn cambiar_estado(
    api: &ApiClient,
    mesa_id: Uuid,
    nuevo_estado: EstadoMesa,
) -> Result<MesaRestaurante, ApiError> {
    let estado = serde_json::to_value(nuevo_estado)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string));
    let params = consulta(&[("nuevo_estado", estado)]);
    api.patch_consulta(&format!("/mesas/{mesa_id}/estado"), &params)
        .await
}

pub async fn eliminar(api: &ApiClient, id: Uuid) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/mesas/{id}")).await
}
