use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EstadoMesa {
    #[default]
    Disponible,
    Ocupada,
    Reservada,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MesaRestaurante {
    pub id: Uuid,
    pub numero_mesa: u32,
    pub capacidad: u32,
    pub restaurante_id: Uuid,
    #[serde(default)]
    pub estado: EstadoMesa,
    #[serde(default)]
    pub orden_activa_id: Option<Uuid>,
    #[serde(default)]
    pub numero_comensales: Option<u32>,
    /// Momento en que la mesa pasó a ocupada.
    #[serde(default)]
    pub tiempo_ocupacion: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MesaRestauranteCreate {
    pub numero_mesa: u32,
    pub capacidad: u32,
    pub restaurante_id: Uuid,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MesaRestauranteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_mesa: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacidad: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurante_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<EstadoMesa>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orden_activa_id: Option<Option<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_comensales: Option<Option<u32>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MesaRestaurantesPublic {
    pub data: Vec<MesaRestaurante>,
    pub count: i64,
}

/// Resumen por estado que encabeza la vista de mesas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MesaEstadisticas {
    pub total: usize,
    pub disponibles: usize,
    pub ocupadas: usize,
    pub reservadas: usize,
}

impl MesaEstadisticas {
    pub fn de(mesas: &[MesaRestaurante]) -> Self {
        let contar = |estado: EstadoMesa| mesas.iter().filter(|m| m.estado == estado).count();
        MesaEstadisticas {
            total: mesas.len(),
            disponibles: contar(EstadoMesa::Disponible),
            ocupadas: contar(EstadoMesa::Ocupada),
            reservadas: contar(EstadoMesa::Reservada),
        }
    }
}
