//! Flujo de atención de mesas: asignación, reapertura, envío de comanda y
//! liberación.
//!
//! El envío es una saga explícita: cada línea viaja con reintentos ante
//! fallos de transporte, el resultado se reporta línea por línea y al
//! final se recarga el estado autoritativo del backend.

use std::collections::HashMap;
use std::future::Future;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::{self, ApiClient};
use crate::borrador::{LineaBorrador, OrdenBorrador};
use crate::error::ApiError;
use crate::models::{
    Comanda, ComandaItem, Destino, EstadoMesa, EstadoOrden, MesaRestaurante, Orden, OrdenCreate,
    OrdenItem, OrdenItemCreate, OrdenItemUpdate, OrdenUpdate,
};

/// Esperas entre intentos, en segundos. El primer intento sale de inmediato.
const ESPERAS_REINTENTO: [u64; 3] = [0, 3, 5];

/// Reintenta una operación solo ante errores transitorios (red, timeout):
/// ahí el servidor nunca respondió y repetir no duplica efectos. Una
/// respuesta HTTP de error es definitiva para esa línea.
async fn reintentar<T, F, Fut>(mut operacion: F, etiqueta: &str) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut ultimo = None;
    for (intento, espera) in ESPERAS_REINTENTO.iter().enumerate() {
        if *espera > 0 {
            tokio::time::sleep(std::time::Duration::from_secs(*espera)).await;
        }
        match operacion().await {
            Ok(valor) => return Ok(valor),
            Err(e) if e.es_transitorio() && intento + 1 < ESPERAS_REINTENTO.len() => {
                warn!(
                    "{etiqueta}: intento {}/{} falló ({e}), reintentando",
                    intento + 1,
                    ESPERAS_REINTENTO.len()
                );
                ultimo = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(ultimo.expect("al menos un intento fallido"))
}

/// Asigna una mesa disponible: crea la orden (`pendiente`) y la asocia a la
/// mesa con el número de comensales. Si el segundo paso falla no hay
/// rollback local; la verdad es lo que el backend reporte en la próxima
/// carga.
pub async fn asignar_mesa(
    api: &ApiClient,
    mesa: &MesaRestaurante,
    numero_comensales: u32,
    cliente_id: Uuid,
) -> Result<OrdenBorrador, ApiError> {
    if mesa.estado != EstadoMesa::Disponible {
        return Err(ApiError::Validacion(format!(
            "La mesa {} no está disponible",
            mesa.numero_mesa
        )));
    }
    if numero_comensales == 0 || numero_comensales > mesa.capacidad {
        return Err(ApiError::Validacion(format!(
            "El número de comensales debe estar entre 1 y {}",
            mesa.capacidad
        )));
    }

    let orden = api::ordenes::crear(
        api,
        &OrdenCreate {
            fecha: Utc::now(),
            total: 0.0,
            estado: Some(EstadoOrden::Pendiente),
            numero_comensales: Some(numero_comensales),
            mesa_id: Some(mesa.id),
            cliente_id,
            restaurante_id: mesa.restaurante_id,
        },
    )
    .await?;

    api::mesas::asignar_orden(api, mesa.id, orden.id, numero_comensales).await?;
    info!(
        "Mesa {} asignada con la orden {}",
        mesa.numero_mesa, orden.id
    );

    Ok(OrdenBorrador::nuevo(
        orden.id,
        mesa.id,
        mesa.numero_mesa,
        numero_comensales,
    ))
}

/// Reabre una mesa ocupada: carga las líneas de su orden activa como
/// persistidas, resolviendo el destino de cada una por la categoría de su
/// producto.
pub async fn reabrir_mesa(
    api: &ApiClient,
    mesa: &MesaRestaurante,
) -> Result<OrdenBorrador, ApiError> {
    let orden_id = mesa.orden_activa_id.ok_or_else(|| {
        ApiError::Validacion(format!(
            "La mesa {} no tiene una orden activa",
            mesa.numero_mesa
        ))
    })?;

    let destinos = destinos_del_restaurante(api, mesa.restaurante_id).await?;
    let items = api::ordenes::items_detallados(api, orden_id).await?;

    let mut borrador = OrdenBorrador::nuevo(
        orden_id,
        mesa.id,
        mesa.numero_mesa,
        mesa.numero_comensales.unwrap_or(1),
    );
    for item in &items.data {
        let destino = destinos
            .get(&item.producto_id)
            .copied()
            .unwrap_or(Destino::Cocina);
        borrador.cargar_persistido(item, destino);
    }
    Ok(borrador)
}

/// Destino por producto para todo un restaurante, resuelto vía categorías.
async fn destinos_del_restaurante(
    api: &ApiClient,
    restaurante_id: Uuid,
) -> Result<HashMap<Uuid, Destino>, ApiError> {
    let categorias = api::productos::listar_categorias(api, Some(restaurante_id), 0, 1000).await?;
    let por_categoria: HashMap<Uuid, Destino> = categorias
        .data
        .iter()
        .map(|c| (c.id, Destino::para_categoria(c)))
        .collect();

    let filtro = api::productos::FiltroProductos {
        restaurante_id: Some(restaurante_id),
        limit: Some(1000),
        ..Default::default()
    };
    let productos = api::productos::listar(api, &filtro).await?;
    Ok(productos
        .data
        .iter()
        .map(|p| {
            let destino = por_categoria
                .get(&p.categoria_id)
                .copied()
                .unwrap_or(Destino::Cocina);
            (p.id, destino)
        })
        .collect())
}

/// Libera la mesa. El llamador debe recargar la lista: el estado que
/// cuenta es el que devuelva el backend.
pub async fn liberar_mesa(api: &ApiClient, mesa_id: Uuid) -> Result<MesaRestaurante, ApiError> {
    api::mesas::liberar(api, mesa_id).await
}

/// Resultado de una línea que no se pudo sincronizar.
#[derive(Debug)]
pub struct FalloLinea {
    pub nombre_producto: String,
    pub error: ApiError,
}

/// Reporte completo de un envío de comanda, línea por línea.
#[derive(Debug)]
pub struct ResumenEnvio {
    pub creados: Vec<OrdenItem>,
    pub actualizados: Vec<OrdenItem>,
    pub fallidos: Vec<FalloLinea>,
    /// Orden tal como quedó tras actualizar total y estado, si se pudo.
    pub orden: Option<Orden>,
    pub error_orden: Option<ApiError>,
    /// Una comanda por destino, solo con las líneas nuevas de este envío.
    pub comandas: Vec<Comanda>,
}

impl ResumenEnvio {
    pub fn exito_total(&self) -> bool {
        self.fallidos.is_empty() && self.error_orden.is_none()
    }
}

/// Envía la comanda: sincroniza línea por línea, actualiza la orden y
/// reconcilia el borrador contra el estado del servidor.
///
/// Cada línea nueva que el backend confirma pasa a `Persistido` en el
/// momento, de modo que un reintento posterior del envío no pueda
/// duplicarla aunque la recarga final falle.
pub async fn enviar_comanda(
    api: &ApiClient,
    borrador: &mut OrdenBorrador,
    mesero: Option<String>,
) -> Result<ResumenEnvio, ApiError> {
    if borrador.esta_vacio() {
        return Err(ApiError::Validacion(
            "No hay productos en la orden".to_string(),
        ));
    }

    let orden_id = borrador.orden_id;
    let mut creados = Vec::new();
    let mut actualizados = Vec::new();
    let mut fallidos = Vec::new();
    let mut lineas_impresas: Vec<LineaBorrador> = Vec::new();

    // Líneas nuevas: POST una a una.
    let nuevos: Vec<(Uuid, LineaBorrador)> = borrador
        .nuevos()
        .map(|(id, linea)| (*id, linea.clone()))
        .collect();
    for (id_local, linea) in nuevos {
        let datos = OrdenItemCreate {
            cantidad: linea.cantidad,
            precio_unitario: linea.precio_unitario,
            subtotal: Some(linea.subtotal),
            notas: linea.notas.clone(),
            orden_id,
            producto_id: linea.producto_id,
        };
        let datos_ref = &datos;
        let resultado = reintentar(
            move || api::ordenes::crear_item(api, datos_ref),
            &format!("crear línea {}", linea.nombre_producto),
        )
        .await;
        match resultado {
            Ok(item) => {
                borrador.confirmar_nuevo(id_local, item.id);
                lineas_impresas.push(linea);
                creados.push(item);
            }
            Err(error) => {
                warn!("Línea {} no se pudo crear: {error}", linea.nombre_producto);
                fallidos.push(FalloLinea {
                    nombre_producto: linea.nombre_producto.clone(),
                    error,
                });
            }
        }
    }

    // Líneas existentes con cambios: PATCH una a una.
    let modificados: Vec<(Uuid, LineaBorrador)> = borrador
        .persistidos_modificados()
        .map(|(id, linea)| (*id, linea.clone()))
        .collect();
    for (id, linea) in modificados {
        let cambios = OrdenItemUpdate {
            cantidad: Some(linea.cantidad),
            precio_unitario: Some(linea.precio_unitario),
            subtotal: Some(linea.subtotal),
            notas: linea.notas.clone(),
            ..Default::default()
        };
        let cambios_ref = &cambios;
        let resultado = reintentar(
            move || api::ordenes::actualizar_item(api, id, cambios_ref),
            &format!("actualizar línea {}", linea.nombre_producto),
        )
        .await;
        match resultado {
            Ok(item) => {
                borrador.confirmar_persistido(id);
                actualizados.push(item);
            }
            Err(error) => {
                warn!(
                    "Línea {} no se pudo actualizar: {error}",
                    linea.nombre_producto
                );
                fallidos.push(FalloLinea {
                    nombre_producto: linea.nombre_producto.clone(),
                    error,
                });
            }
        }
    }

    // Total de la orden: solo lo que el backend ya confirmó.
    let total: f64 = borrador
        .items()
        .iter()
        .filter(|i| !i.es_nuevo())
        .map(|i| i.linea().subtotal)
        .sum();

    let cambio_orden = OrdenUpdate {
        fecha: Utc::now(),
        total,
        estado: Some(EstadoOrden::EnProceso),
        mesa_id: None,
        cliente_id: None,
        restaurante_id: None,
    };
    let cambio_ref = &cambio_orden;
    let (orden, error_orden) = match reintentar(
        move || api::ordenes::actualizar(api, orden_id, cambio_ref),
        "actualizar orden",
    )
    .await
    {
        Ok(orden) => (Some(orden), None),
        Err(e) => {
            warn!("No se pudo actualizar la orden {orden_id}: {e}");
            (None, Some(e))
        }
    };

    // Reconciliación: el servidor tiene la última palabra sobre las líneas.
    // Si la recarga falla se conserva la vista local, que ya distingue lo
    // confirmado de lo pendiente.
    let destinos = borrador.destinos_por_producto();
    match api::ordenes::items_detallados(api, orden_id).await {
        Ok(respuesta) => {
            let items = respuesta
                .data
                .into_iter()
                .map(|item| {
                    let destino = destinos
                        .get(&item.producto_id)
                        .copied()
                        .unwrap_or(Destino::Cocina);
                    (item, destino)
                })
                .collect();
            borrador.reconciliar(items);
        }
        Err(e) => warn!("No se pudo recargar la orden {orden_id}: {e}"),
    }

    let comandas = comandas_de_lineas(
        orden_id,
        borrador.mesa_numero,
        Some(borrador.numero_comensales),
        mesero,
        &lineas_impresas,
    );

    info!(
        "Envío de la orden {orden_id}: {} creadas, {} actualizadas, {} fallidas",
        creados.len(),
        actualizados.len(),
        fallidos.len()
    );

    Ok(ResumenEnvio {
        creados,
        actualizados,
        fallidos,
        orden,
        error_orden,
        comandas,
    })
}

/// Agrupa líneas por destino y arma una comanda por cada destino con
/// contenido: primero cocina, luego bar.
pub fn comandas_de_lineas(
    orden_id: Uuid,
    mesa_numero: u32,
    numero_comensales: Option<u32>,
    mesero: Option<String>,
    lineas: &[LineaBorrador],
) -> Vec<Comanda> {
    let fecha_hora = Utc::now();
    [Destino::Cocina, Destino::Bar]
        .into_iter()
        .filter_map(|destino| {
            let items: Vec<ComandaItem> = lineas
                .iter()
                .filter(|l| l.destino == destino)
                .map(|l| ComandaItem {
                    producto: l.nombre_producto.clone(),
                    cantidad: l.cantidad,
                    modificadores: l
                        .modificadores
                        .iter()
                        .map(|m| format!("{}: {}", m.nombre_modificador, m.nombre_opcion))
                        .collect(),
                    notas: l.notas.clone(),
                })
                .collect();
            if items.is_empty() {
                return None;
            }
            Some(Comanda {
                id: Uuid::new_v4(),
                orden_id,
                mesa_numero,
                fecha_hora,
                destino,
                items,
                numero_comensales,
                mesero: mesero.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn linea(nombre: &str, destino: Destino) -> LineaBorrador {
        LineaBorrador {
            producto_id: Uuid::new_v4(),
            nombre_producto: nombre.to_string(),
            cantidad: 1,
            precio_unitario: 5.0,
            subtotal: 5.0,
            notas: None,
            modificadores: Vec::new(),
            destino,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reintenta_solo_errores_transitorios() {
        let intentos = AtomicU32::new(0);
        let resultado: Result<u32, ApiError> = reintentar(
            || {
                let n = intentos.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ApiError::Red("conexión caída".into()))
                    } else {
                        Ok(n)
                    }
                }
            },
            "prueba",
        )
        .await;
        assert_eq!(resultado.unwrap(), 2);
        assert_eq!(intentos.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn un_error_http_es_definitivo() {
        let intentos = AtomicU32::new(0);
        let resultado: Result<u32, ApiError> = reintentar(
            || {
                intentos.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(ApiError::Http {
                        estado: 422,
                        mensaje: "datos inválidos".into(),
                        cuerpo: None,
                    })
                }
            },
            "prueba",
        )
        .await;
        assert!(matches!(resultado, Err(ApiError::Http { estado: 422, .. })));
        assert_eq!(intentos.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn se_rinde_tras_agotar_los_intentos() {
        let intentos = AtomicU32::new(0);
        let resultado: Result<u32, ApiError> = reintentar(
            || {
                intentos.fetch_add(1, Ordering::SeqCst);
                async { Err(ApiError::TiempoAgotado) }
            },
            "prueba",
        )
        .await;
        assert!(matches!(resultado, Err(ApiError::TiempoAgotado)));
        assert_eq!(intentos.load(Ordering::SeqCst), ESPERAS_REINTENTO.len() as u32);
    }

    #[test]
    fn una_comanda_por_destino_y_solo_con_sus_lineas() {
        let lineas = vec![
            linea("Lomo", Destino::Cocina),
            linea("Mojito", Destino::Bar),
            linea("Ensalada", Destino::Cocina),
        ];
        let comandas = comandas_de_lineas(Uuid::new_v4(), 4, Some(3), None, &lineas);

        assert_eq!(comandas.len(), 2);
        assert_eq!(comandas[0].destino, Destino::Cocina);
        assert_eq!(comandas[0].items.len(), 2);
        assert_eq!(comandas[1].destino, Destino::Bar);
        assert_eq!(comandas[1].items.len(), 1);
        assert_eq!(comandas[1].items[0].producto, "Mojito");
    }

    #[test]
    fn sin_lineas_de_un_destino_no_hay_comanda() {
        let lineas = vec![linea("Lomo", Destino::Cocina)];
        let comandas = comandas_de_lineas(Uuid::new_v4(), 1, None, None, &lineas);
        assert_eq!(comandas.len(), 1);
        assert_eq!(comandas[0].destino, Destino::Cocina);
    }

    #[test]
    fn las_comandas_llevan_modificadores_y_notas() {
        let mut con_detalle = linea("Hamburguesa", Destino::Cocina);
        con_detalle.modificadores = vec![crate::models::ModificadorSeleccionado {
            modificador_id: Uuid::new_v4(),
            opcion_id: Uuid::new_v4(),
            nombre_modificador: "Término".to_string(),
            nombre_opcion: "Tres cuartos".to_string(),
            precio_adicional: 0.0,
        }];
        con_detalle.notas = Some("Sin cebolla".to_string());

        let comandas = comandas_de_lineas(Uuid::new_v4(), 2, None, None, &[con_detalle]);
        assert_eq!(comandas[0].items[0].modificadores, vec!["Término: Tres cuartos"]);
        assert_eq!(comandas[0].items[0].notas.as_deref(), Some("Sin cebolla"));
    }
}
