use crate::error::ApiError;
use crate::models::{Token, Usuario};

use super::ApiClient;

/// Inicia sesión con el flujo OAuth2 de contraseña del backend y deja el
/// token en la sesión del cliente. Con `recordar`, el token sobrevive al
/// proceso.
pub async fn iniciar_sesion(
    api: &ApiClient,
    usuario: &str,
    clave: &str,
    recordar: bool,
) -> Result<Token, ApiError> {
    let campos = [
        ("username", usuario),
        ("password", clave),
        ("grant_type", "password"),
    ];
    let token: Token = api
        .post_formulario("/login/access-token", &campos, false)
        .await?;
    api.sesion().establecer(token.access_token.clone(), recordar);
    Ok(token)
}

/// Valida el token vigente contra el backend.
pub async fn probar_token(api: &ApiClient) -> Result<Usuario, ApiError> {
    api.post("/login/test-token", &serde_json::json!({})).await
}

/// Usuario autenticado actual.
pub async fn usuario_actual(api: &ApiClient) -> Result<Usuario, ApiError> {
    api.get("/users/me", &[]).await
}

/// Cierra la sesión local. El backend no guarda estado de sesión.
pub fn cerrar_sesion(api: &ApiClient) {
    api.sesion().limpiar();
}
