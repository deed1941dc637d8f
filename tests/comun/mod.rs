//! Backend de mentira para las pruebas de integración: implementa los
//! endpoints que usa el cliente, con estado en memoria.

// Cada archivo de tests compila este módulo por separado y no todos usan
// todo el servidor.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Form, Json, Router};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use comandero::models::{
    Categoria, CategoriasPublic, Destino, EstadoMesa, EstadoOrden, MesaRestaurante,
    MesaRestaurantesPublic, Orden, OrdenCreate, OrdenItem, OrdenItemCreate, OrdenItemDetallado,
    OrdenItemsDetalladosPublic, OrdenItemUpdate, OrdenUpdate, Producto, ProductosPublic, Usuario,
};

pub const USUARIO: &str = "mesero@rest.com";
pub const CLAVE: &str = "secreto";
pub const TOKEN: &str = "token-de-prueba";

pub struct Estado {
    pub restaurante_id: Uuid,
    pub cliente_id: Uuid,
    pub categorias: Vec<Categoria>,
    pub productos: Vec<Producto>,
    pub mesas: Mutex<Vec<MesaRestaurante>>,
    pub ordenes: Mutex<HashMap<Uuid, Orden>>,
    pub items: Mutex<Vec<OrdenItemDetallado>>,
    /// Cuántas creaciones de línea deben fallar con 500 antes de funcionar.
    pub fallos_crear_item: Mutex<u32>,
}

impl Estado {
    /// Un restaurante con dos categorías (comida y bebida), un producto en
    /// cada una y tres mesas libres.
    pub fn semilla() -> Arc<Estado> {
        let restaurante_id = Uuid::new_v4();
        let comidas = Categoria {
            id: Uuid::new_v4(),
            nombre: "Platos fuertes".to_string(),
            descripcion: None,
            restaurante_id,
            categoria_id: None,
            destino: None,
        };
        let bebidas = Categoria {
            id: Uuid::new_v4(),
            nombre: "Bebidas".to_string(),
            descripcion: None,
            restaurante_id,
            categoria_id: None,
            destino: None,
        };
        let producto = |nombre: &str, precio: f64, categoria: &Categoria| Producto {
            id: Uuid::new_v4(),
            nombre: nombre.to_string(),
            descripcion: None,
            precio,
            stock: 50,
            imagen: None,
            categoria_id: categoria.id,
            restaurante_id,
            empresa_id: Uuid::new_v4(),
            tasa_impositiva_id: None,
        };
        let productos = vec![
            producto("Lomo saltado", 12.5, &comidas),
            producto("Mojito", 6.0, &bebidas),
        ];
        let mesas = (1..=3)
            .map(|numero| MesaRestaurante {
                id: Uuid::new_v4(),
                numero_mesa: numero,
                capacidad: 4,
                restaurante_id,
                estado: EstadoMesa::Disponible,
                orden_activa_id: None,
                numero_comensales: None,
                tiempo_ocupacion: None,
            })
            .collect();

        Arc::new(Estado {
            restaurante_id,
            cliente_id: Uuid::new_v4(),
            categorias: vec![comidas, bebidas],
            productos,
            mesas: Mutex::new(mesas),
            ordenes: Mutex::new(HashMap::new()),
            items: Mutex::new(Vec::new()),
            fallos_crear_item: Mutex::new(0),
        })
    }

    pub fn producto(&self, nombre: &str) -> &Producto {
        self.productos
            .iter()
            .find(|p| p.nombre == nombre)
            .expect("producto sembrado")
    }

    pub fn mesa(&self, numero: u32) -> MesaRestaurante {
        self.mesas
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.numero_mesa == numero)
            .expect("mesa sembrada")
            .clone()
    }
}

/// Levanta el servidor en un puerto libre y devuelve su URL base.
pub async fn arrancar(estado: Arc<Estado>) -> String {
    let app = rutas(estado);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let direccion = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{direccion}")
}

fn rutas(estado: Arc<Estado>) -> Router {
    Router::new()
        .route("/login/access-token", post(login))
        .route("/users/me", get(usuario_me))
        .route("/mesas/restaurante/{id}", get(mesas_de_restaurante))
        .route("/mesas/{id}/asignar-orden", patch(asignar_orden))
        .route("/mesas/{id}/liberar", patch(liberar_mesa))
        .route("/ordenes", post(crear_orden))
        .route("/ordenes/{id}", patch(actualizar_orden))
        .route("/ordenes/{id}/items", get(items_de_orden))
        .route("/orden-items", post(crear_item))
        .route("/orden-items/{id}", patch(actualizar_item))
        .route("/categorias", get(listar_categorias))
        .route("/productos", get(listar_productos))
        .route("/demorado", get(demorado))
        .route("/fallo", get(fallo))
        .with_state(estado)
}

fn autorizado(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn no_autorizado() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Not authenticated" })),
    )
        .into_response()
}

fn no_encontrado(detalle: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": detalle }))).into_response()
}

async fn login(Form(campos): Form<HashMap<String, String>>) -> Response {
    let usuario = campos.get("username").map(String::as_str);
    let clave = campos.get("password").map(String::as_str);
    let grant = campos.get("grant_type").map(String::as_str);
    if usuario == Some(USUARIO) && clave == Some(CLAVE) && grant == Some("password") {
        Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Incorrect email or password" })),
        )
            .into_response()
    }
}

async fn usuario_me(headers: HeaderMap) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    Json(Usuario {
        id: Uuid::new_v4(),
        email: USUARIO.to_string(),
        full_name: Some("Mesero de Prueba".to_string()),
        is_active: true,
        is_superuser: false,
        created_at: None,
        updated_at: None,
    })
    .into_response()
}

async fn mesas_de_restaurante(
    State(estado): State<Arc<Estado>>,
    headers: HeaderMap,
    Path(restaurante_id): Path<Uuid>,
) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    let mesas: Vec<MesaRestaurante> = estado
        .mesas
        .lock()
        .unwrap()
        .iter()
        .filter(|m| m.restaurante_id == restaurante_id)
        .cloned()
        .collect();
    let count = mesas.len() as i64;
    Json(MesaRestaurantesPublic { data: mesas, count }).into_response()
}

async fn asignar_orden(
    State(estado): State<Arc<Estado>>,
    headers: HeaderMap,
    Path(mesa_id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    let orden_id: Uuid = match params.get("orden_id").and_then(|v| v.parse().ok()) {
        Some(id) => id,
        None => return no_encontrado("orden_id inválido"),
    };
    let comensales: u32 = params
        .get("numero_comensales")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);

    let mut mesas = estado.mesas.lock().unwrap();
    match mesas.iter_mut().find(|m| m.id == mesa_id) {
        Some(mesa) => {
            mesa.estado = EstadoMesa::Ocupada;
            mesa.orden_activa_id = Some(orden_id);
            mesa.numero_comensales = Some(comensales);
            mesa.tiempo_ocupacion = Some(Utc::now());
            Json(mesa.clone()).into_response()
        }
        None => no_encontrado("La mesa con este ID no existe en el sistema."),
    }
}

async fn liberar_mesa(
    State(estado): State<Arc<Estado>>,
    headers: HeaderMap,
    Path(mesa_id): Path<Uuid>,
) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    let mut mesas = estado.mesas.lock().unwrap();
    match mesas.iter_mut().find(|m| m.id == mesa_id) {
        Some(mesa) => {
            mesa.estado = EstadoMesa::Disponible;
            mesa.orden_activa_id = None;
            mesa.numero_comensales = None;
            mesa.tiempo_ocupacion = None;
            Json(mesa.clone()).into_response()
        }
        None => no_encontrado("La mesa con este ID no existe en el sistema."),
    }
}

async fn crear_orden(
    State(estado): State<Arc<Estado>>,
    headers: HeaderMap,
    Json(datos): Json<OrdenCreate>,
) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    let orden = Orden {
        id: Uuid::new_v4(),
        fecha: datos.fecha,
        estado: datos.estado.unwrap_or(EstadoOrden::Pendiente),
        total: datos.total,
        numero_comensales: datos.numero_comensales,
        mesa_id: datos.mesa_id,
        cliente_id: datos.cliente_id,
        restaurante_id: datos.restaurante_id,
        items: None,
        total_items: None,
        mesa_numero: None,
    };
    estado.ordenes.lock().unwrap().insert(orden.id, orden.clone());
    Json(orden).into_response()
}

async fn actualizar_orden(
    State(estado): State<Arc<Estado>>,
    headers: HeaderMap,
    Path(orden_id): Path<Uuid>,
    Json(cambios): Json<OrdenUpdate>,
) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    let mut ordenes = estado.ordenes.lock().unwrap();
    match ordenes.get_mut(&orden_id) {
        Some(orden) => {
            orden.fecha = cambios.fecha;
            orden.total = cambios.total;
            if let Some(estado_nuevo) = cambios.estado {
                orden.estado = estado_nuevo;
            }
            Json(orden.clone()).into_response()
        }
        None => no_encontrado("La orden con este ID no existe en el sistema."),
    }
}

async fn items_de_orden(
    State(estado): State<Arc<Estado>>,
    headers: HeaderMap,
    Path(orden_id): Path<Uuid>,
) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    let data: Vec<OrdenItemDetallado> = estado
        .items
        .lock()
        .unwrap()
        .iter()
        .filter(|i| i.orden_id == orden_id)
        .cloned()
        .collect();
    let count = data.len() as i64;
    Json(OrdenItemsDetalladosPublic { data, count }).into_response()
}

async fn crear_item(
    State(estado): State<Arc<Estado>>,
    headers: HeaderMap,
    Json(datos): Json<OrdenItemCreate>,
) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    {
        let mut fallos = estado.fallos_crear_item.lock().unwrap();
        if *fallos > 0 {
            *fallos -= 1;
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Fallo simulado" })),
            )
                .into_response();
        }
    }
    let nombre = estado
        .productos
        .iter()
        .find(|p| p.id == datos.producto_id)
        .map(|p| p.nombre.clone());
    let detallado = OrdenItemDetallado {
        id: Uuid::new_v4(),
        orden_id: datos.orden_id,
        producto_id: datos.producto_id,
        cantidad: datos.cantidad,
        precio_unitario: datos.precio_unitario,
        notas: datos.notas.clone(),
        producto_nombre: nombre,
        producto_descripcion: None,
    };
    let item = OrdenItem {
        id: detallado.id,
        cantidad: datos.cantidad,
        precio_unitario: datos.precio_unitario,
        subtotal: datos
            .subtotal
            .unwrap_or(datos.precio_unitario * datos.cantidad as f64),
        notas: datos.notas,
        orden_id: datos.orden_id,
        producto_id: datos.producto_id,
        modificadores: None,
    };
    estado.items.lock().unwrap().push(detallado);
    Json(item).into_response()
}

async fn actualizar_item(
    State(estado): State<Arc<Estado>>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
    Json(cambios): Json<OrdenItemUpdate>,
) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    let mut items = estado.items.lock().unwrap();
    match items.iter_mut().find(|i| i.id == item_id) {
        Some(item) => {
            if let Some(cantidad) = cambios.cantidad {
                item.cantidad = cantidad;
            }
            if let Some(precio) = cambios.precio_unitario {
                item.precio_unitario = precio;
            }
            if let Some(notas) = cambios.notas {
                item.notas = Some(notas);
            }
            let respuesta = OrdenItem {
                id: item.id,
                cantidad: item.cantidad,
                precio_unitario: item.precio_unitario,
                subtotal: cambios
                    .subtotal
                    .unwrap_or(item.precio_unitario * item.cantidad as f64),
                notas: item.notas.clone(),
                orden_id: item.orden_id,
                producto_id: item.producto_id,
                modificadores: None,
            };
            Json(respuesta).into_response()
        }
        None => no_encontrado("La línea con este ID no existe en el sistema."),
    }
}

async fn listar_categorias(State(estado): State<Arc<Estado>>, headers: HeaderMap) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    Json(CategoriasPublic {
        count: estado.categorias.len() as i64,
        data: estado.categorias.clone(),
    })
    .into_response()
}

async fn listar_productos(
    State(estado): State<Arc<Estado>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !autorizado(&headers) {
        return no_autorizado();
    }
    let categoria: Option<Uuid> = params.get("categoria_id").and_then(|v| v.parse().ok());
    let data: Vec<Producto> = estado
        .productos
        .iter()
        .filter(|p| categoria.map(|c| p.categoria_id == c).unwrap_or(true))
        .cloned()
        .collect();
    let count = data.len() as i64;
    Json(ProductosPublic { data, count }).into_response()
}

/// Tarda más que cualquier timeout razonable de prueba.
async fn demorado() -> Response {
    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    Json(json!({ "ok": true })).into_response()
}

async fn fallo() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": "Datos inválidos" })),
    )
        .into_response()
}

/// El destino que el cliente debería deducir para un producto sembrado.
pub fn destino_esperado(estado: &Estado, producto: &Producto) -> Destino {
    let categoria = estado
        .categorias
        .iter()
        .find(|c| c.id == producto.categoria_id)
        .expect("categoría sembrada");
    Destino::para_categoria(categoria)
}
