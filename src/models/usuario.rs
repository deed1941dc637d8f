use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Usuario {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsuarioCreate {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UsuarioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsuariosPublic {
    pub data: Vec<Usuario>,
    pub count: i64,
}

/// Usuario con sus relaciones de autorización resueltas.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UsuarioConRoles {
    #[serde(flatten)]
    pub usuario: Usuario,
    #[serde(default)]
    pub roles: Vec<Rol>,
    #[serde(default)]
    pub permisos_directos: Vec<Permiso>,
    #[serde(default)]
    pub permisos_totales: Vec<Permiso>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Rol {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RolCreate {
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RolUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RolesPublic {
    pub data: Vec<Rol>,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Permiso {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PermisoCreate {
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PermisoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PermisosPublic {
    pub data: Vec<Permiso>,
    pub count: i64,
}

/// Respuesta de `POST /login/access-token`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
