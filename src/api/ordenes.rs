use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    EstadoOrden, Orden, OrdenCreate, OrdenEstadoUpdate, OrdenesPublic, OrdenItem,
    OrdenItemCantidadUpdate, OrdenItemCreate, OrdenItemsDetalladosPublic, OrdenItemsPublic,
    OrdenItemUpdate, OrdenUpdate,
};

use super::{consulta, ApiClient, Confirmacion};

#[derive(Debug, Default, Clone)]
pub struct FiltroOrdenes {
    pub restaurante_id: Option<Uuid>,
    pub cliente_id: Option<Uuid>,
    pub mesa_id: Option<Uuid>,
    pub estado: Option<EstadoOrden>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn listar(api: &ApiClient, filtro: &FiltroOrdenes) -> Result<OrdenesPublic, ApiError> {
    let estado = filtro
        .estado
        .map(|e| serde_json::to_value(e).expect("estado serializable"))
        .and_then(|v| v.as_str().map(str::to_string));
    let params = consulta(&[
        ("restaurante_id", filtro.restaurante_id.map(|u| u.to_string())),
        ("cliente_id", filtro.cliente_id.map(|u| u.to_string())),
        ("mesa_id", filtro.mesa_id.map(|u| u.to_string())),
        ("estado", estado),
        ("skip", Some(filtro.skip.unwrap_or(0).to_string())),
        ("limit", Some(filtro.limit.unwrap_or(100).to_string())),
    ]);
    api.get("/ordenes", &params).await
}

pub async fn obtener(api: &ApiClient, id: Uuid) -> Result<Orden, ApiError> {
    api.get(&format!("/ordenes/{id}"), &[]).await
}

/// Órdenes vivas (pendiente, en_proceso, completada) de un restaurante.
pub async fn listar_activas(
    api: &ApiClient,
    restaurante_id: Uuid,
    skip: u32,
    limit: u32,
) -> Result<OrdenesPublic, ApiError> {
    let params = consulta(&[
        ("skip", Some(skip.to_string())),
        ("limit", Some(limit.to_string())),
    ]);
    api.get(
        &format!("/ordenes/activas/restaurante/{restaurante_id}"),
        &params,
    )
    .await
}

/// Líneas de una orden con el producto ya resuelto.
pub async fn items_detallados(
    api: &ApiClient,
    orden_id: Uuid,
) -> Result<OrdenItemsDetalladosPublic, ApiError> {
    api.get(&format!("/ordenes/{orden_id}/items"), &[]).await
}

pub async fn crear(api: &ApiClient, datos: &OrdenCreate) -> Result<Orden, ApiError> {
    api.post("/ordenes", datos).await
}

pub async fn actualizar(api: &ApiClient, id: Uuid, cambios: &OrdenUpdate) -> Result<Orden, ApiError> {
    api.patch(&format!("/ordenes/{id}"), cambios).await
}

pub async fn actualizar_estado(
    api: &ApiClient,
    id: Uuid,
    estado: EstadoOrden,
) -> Result<Orden, ApiError> {
    api.patch(
        &format!("/ordenes/{id}/estado"),
        &OrdenEstadoUpdate { estado },
    )
    .await
}

pub async fn eliminar(api: &ApiClient, id: Uuid) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/ordenes/{id}")).await
}

pub async fn listar_items(
    api: &ApiClient,
    orden_id: Option<Uuid>,
    skip: u32,
    limit: u32,
) -> Result<OrdenItemsPublic, ApiError> {
    let params = consulta(&[
        ("orden_id", orden_id.map(|u| u.to_string())),
        ("skip", Some(skip.to_string())),
        ("limit", Some(limit.to_string())),
    ]);
    api.get("/orden-items", &params).await
}

pub async fn obtener_item(api: &ApiClient, id: Uuid) -> Result<OrdenItem, ApiError> {
    api.get(&format!("/orden-items/{id}"), &[]).await
}

/// Crea una línea; el backend descuenta stock del producto.
pub async fn crear_item(api: &ApiClient, datos: &OrdenItemCreate) -> Result<OrdenItem, ApiError> {
    api.post("/orden-items", datos).await
}

pub async fn actualizar_item(
    api: &ApiClient,
    id: Uuid,
    cambios: &OrdenItemUpdate,
) -> Result<OrdenItem, ApiError> {
    api.patch(&format!("/orden-items/{id}"), cambios).await
}

pub async fn actualizar_cantidad_item(
    api: &ApiClient,
    id: Uuid,
    cantidad: u32,
) -> Result<OrdenItem, ApiError> {
    api.patch(
        &format!("/orden-items/{id}/cantidad"),
        &OrdenItemCantidadUpdate { cantidad },
    )
    .await
}

/// Elimina una línea; el backend repone el stock.
pub async fn eliminar_item(api: &ApiClient, id: Uuid) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/orden-items/{id}")).await
}

pub async fn eliminar_items_de_orden(
    api: &ApiClient,
    orden_id: Uuid,
) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/orden-items/orden/{orden_id}")).await
}
