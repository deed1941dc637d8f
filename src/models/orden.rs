use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::producto::ModificadorSeleccionado;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EstadoOrden {
    Pendiente,
    EnProceso,
    Completada,
    Cancelada,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Orden {
    pub id: Uuid,
    pub fecha: DateTime<Utc>,
    pub estado: EstadoOrden,
    pub total: f64,
    pub numero_comensales: Option<u32>,
    pub mesa_id: Option<Uuid>,
    pub cliente_id: Uuid,
    pub restaurante_id: Uuid,
    /// Detalle opcional que algunos endpoints incluyen ya resuelto.
    #[serde(default)]
    pub items: Option<Vec<OrdenItemDetallado>>,
    #[serde(default)]
    pub total_items: Option<i64>,
    #[serde(default)]
    pub mesa_numero: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrdenCreate {
    pub fecha: DateTime<Utc>,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<EstadoOrden>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_comensales: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesa_id: Option<Uuid>,
    pub cliente_id: Uuid,
    pub restaurante_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrdenUpdate {
    pub fecha: DateTime<Utc>,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<EstadoOrden>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesa_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurante_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrdenEstadoUpdate {
    pub estado: EstadoOrden,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrdenesPublic {
    pub data: Vec<Orden>,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrdenItem {
    pub id: Uuid,
    pub cantidad: u32,
    pub precio_unitario: f64,
    pub subtotal: f64,
    pub notas: Option<String>,
    pub orden_id: Uuid,
    pub producto_id: Uuid,
    #[serde(default)]
    pub modificadores: Option<Vec<ModificadorSeleccionado>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrdenItemCreate {
    pub cantidad: u32,
    pub precio_unitario: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    pub orden_id: Uuid,
    pub producto_id: Uuid,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OrdenItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_unitario: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orden_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producto_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrdenItemCantidadUpdate {
    pub cantidad: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrdenItemsPublic {
    pub data: Vec<OrdenItem>,
    pub count: i64,
}

/// Línea de orden con el producto ya resuelto, tal como la devuelve
/// `GET /ordenes/{id}/items`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrdenItemDetallado {
    pub id: Uuid,
    pub orden_id: Uuid,
    pub producto_id: Uuid,
    pub cantidad: u32,
    pub precio_unitario: f64,
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default)]
    pub producto_nombre: Option<String>,
    #[serde(default)]
    pub producto_descripcion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrdenItemsDetalladosPublic {
    pub data: Vec<OrdenItemDetallado>,
    pub count: i64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn estado_orden_se_serializa_en_snake_case() {
        let json = serde_json::to_string(&EstadoOrden::EnProceso).unwrap();
        assert_eq!(json, "\"en_proceso\"");

        let estado: EstadoOrden = serde_json::from_str("\"pendiente\"").unwrap();
        assert_eq!(estado, EstadoOrden::Pendiente);
    }

    #[test]
    fn update_omite_campos_sin_valor() {
        let cambio = OrdenItemUpdate {
            cantidad: Some(3),
            ..Default::default()
        };
        let json = serde_json::to_value(&cambio).unwrap();
        assert_eq!(json, serde_json::json!({ "cantidad": 3 }));
    }
}
