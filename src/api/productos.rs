use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    Categoria, CategoriaCreate, CategoriasPublic, CategoriaUpdate, Producto,
    ProductoConModificadores, ProductoCreate, ProductosPublic, ProductoStockUpdate,
    ProductoUpdate,
};

use super::{consulta, ApiClient, Confirmacion};

#[derive(Debug, Default, Clone)]
pub struct FiltroProductos {
    pub restaurante_id: Option<Uuid>,
    pub categoria_id: Option<Uuid>,
    pub empresa_id: Option<Uuid>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn listar(api: &ApiClient, filtro: &FiltroProductos) -> Result<ProductosPublic, ApiError> {
    let params = consulta(&[
        ("restaurante_id", filtro.restaurante_id.map(|u| u.to_string())),
        ("categoria_id", filtro.categoria_id.map(|u| u.to_string())),
        ("empresa_id", filtro.empresa_id.map(|u| u.to_string())),
        ("skip", Some(filtro.skip.unwrap_or(0).to_string())),
        ("limit", Some(filtro.limit.unwrap_or(100).to_string())),
    ]);
    api.get("/productos", &params).await
}

pub async fn obtener(api: &ApiClient, id: Uuid) -> Result<Producto, ApiError> {
    api.get(&format!("/productos/{id}"), &[]).await
}

/// Producto con sus grupos de modificadores resueltos.
pub async fn obtener_con_modificadores(
    api: &ApiClient,
    id: Uuid,
) -> Result<ProductoConModificadores, ApiError> {
    api.get(&format!("/productos/{id}/modificadores"), &[]).await
}

pub async fn crear(api: &ApiClient, datos: &ProductoCreate) -> Result<Producto, ApiError> {
    api.post("/productos", datos).await
}

pub async fn actualizar(
    api: &ApiClient,
    id: Uuid,
    cambios: &ProductoUpdate,
) -> Result<Producto, ApiError> {
    api.patch(&format!("/productos/{id}"), cambios).await
}

pub async fn actualizar_stock(api: &ApiClient, id: Uuid, stock: i64) -> Result<Producto, ApiError> {
    api.patch(
        &format!("/productos/{id}/stock"),
        &ProductoStockUpdate { stock },
    )
    .await
}

pub async fn eliminar(api: &ApiClient, id: Uuid) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/productos/{id}")).await
}

pub async fn listar_categorias(
    api: &ApiClient,
    restaurante_id: Option<Uuid>,
    skip: u32,
    limit: u32,
) -> Result<CategoriasPublic, ApiError> {
    let params = consulta(&[
        ("restaurante_id", restaurante_id.map(|u| u.to_string())),
        ("skip", Some(skip.to_string())),
        ("limit", Some(limit.to_string())),
    ]);
    api.get("/categorias", &params).await
}

pub async fn obtener_categoria(api: &ApiClient, id: Uuid) -> Result<Categoria, ApiError> {
    api.get(&format!("/categorias/{id}"), &[]).await
}

pub async fn crear_categoria(
    api: &ApiClient,
    datos: &CategoriaCreate,
) -> Result<Categoria, ApiError> {
    api.post("/categorias", datos).await
}

pub async fn actualizar_categoria(
    api: &ApiClient,
    id: Uuid,
    cambios: &CategoriaUpdate,
) -> Result<Categoria, ApiError> {
    api.patch(&format!("/categorias/{id}"), cambios).await
}

pub async fn eliminar_categoria(api: &ApiClient, id: Uuid) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/categorias/{id}")).await
}

/// Filtro local del buscador del selector de menú: coincide por nombre o
/// descripción, sin distinguir mayúsculas.
pub fn filtrar_por_texto<'a>(productos: &'a [Producto], texto: &str) -> Vec<&'a Producto> {
    let aguja = texto.to_lowercase();
    productos
        .iter()
        .filter(|p| {
            p.nombre.to_lowercase().contains(&aguja)
                || p.descripcion
                    .as_deref()
                    .map(|d| d.to_lowercase().contains(&aguja))
                    .unwrap_or(false)
        })
        .collect()
}
