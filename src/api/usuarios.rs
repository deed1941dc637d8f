use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    Permiso, PermisoCreate, PermisosPublic, PermisoUpdate, Rol, RolCreate, RolesPublic, RolUpdate,
    Usuario, UsuarioConRoles, UsuarioCreate, UsuariosPublic, UsuarioUpdate,
};

use super::{consulta, ApiClient, Confirmacion};

fn paginacion(skip: u32, limit: u32) -> Vec<(String, String)> {
    consulta(&[
        ("skip", Some(skip.to_string())),
        ("limit", Some(limit.to_string())),
    ])
}

pub async fn listar(api: &ApiClient, skip: u32, limit: u32) -> Result<UsuariosPublic, ApiError> {
    api.get("/users", &paginacion(skip, limit)).await
}

pub async fn obtener(api: &ApiClient, id: Uuid) -> Result<Usuario, ApiError> {
    api.get(&format!("/users/{id}"), &[]).await
}

/// Usuario con roles y permisos resueltos, como lo pinta la página de
/// administración.
pub async fn obtener_con_roles(api: &ApiClient, id: Uuid) -> Result<UsuarioConRoles, ApiError> {
    api.get(&format!("/users/{id}/roles"), &[]).await
}

pub async fn crear(api: &ApiClient, datos: &UsuarioCreate) -> Result<Usuario, ApiError> {
    api.post("/users", datos).await
}

pub async fn actualizar(
    api: &ApiClient,
    id: Uuid,
    cambios: &UsuarioUpdate,
) -> Result<Usuario, ApiError> {
    api.patch(&format!("/users/{id}"), cambios).await
}

pub async fn eliminar(api: &ApiClient, id: Uuid) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/users/{id}")).await
}

pub async fn listar_roles(api: &ApiClient, skip: u32, limit: u32) -> Result<RolesPublic, ApiError> {
    api.get("/roles", &paginacion(skip, limit)).await
}

pub async fn crear_rol(api: &ApiClient, datos: &RolCreate) -> Result<Rol, ApiError> {
    api.post("/roles", datos).await
}

pub async fn actualizar_rol(api: &ApiClient, id: Uuid, cambios: &RolUpdate) -> Result<Rol, ApiError> {
    api.patch(&format!("/roles/{id}"), cambios).await
}

pub async fn eliminar_rol(api: &ApiClient, id: Uuid) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/roles/{id}")).await
}

/// Asocia un rol a un usuario.
pub async fn asignar_rol(api: &ApiClient, user_id: Uuid, rol_id: Uuid) -> Result<Confirmacion, ApiError> {
    api.post(
        &format!("/users/{user_id}/roles"),
        &serde_json::json!({ "rol_id": rol_id }),
    )
    .await
}

pub async fn listar_permisos(
    api: &ApiClient,
    skip: u32,
    limit: u32,
) -> Result<PermisosPublic, ApiError> {
    api.get("/permisos", &paginacion(skip, limit)).await
}

pub async fn crear_permiso(api: &ApiClient, datos: &PermisoCreate) -> Result<Permiso, ApiError> {
    api.post("/permisos", datos).await
}

pub async fn actualizar_permiso(
    api: &ApiClient,
    id: Uuid,
    cambios: &PermisoUpdate,
) -> Result<Permiso, ApiError> {
    api.patch(&format!("/permisos/{id}"), cambios).await
}

pub async fn eliminar_permiso(api: &ApiClient, id: Uuid) -> Result<Confirmacion, ApiError> {
    api.delete(&format!("/permisos/{id}")).await
}
