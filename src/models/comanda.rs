use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::producto::Categoria;

/// Destino de impresión de una línea: determina en qué comanda sale.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Destino {
    Cocina,
    Bar,
}

impl Destino {
    /// Resuelve el destino de una categoría. El campo explícito manda;
    /// para backends que aún no lo envían se conserva la heurística
    /// histórica por nombre ("bebida" → bar) y en último término cocina.
    pub fn para_categoria(categoria: &Categoria) -> Destino {
        if let Some(destino) = categoria.destino {
            return destino;
        }
        if categoria.nombre.to_lowercase().contains("bebida") {
            Destino::Bar
        } else {
            Destino::Cocina
        }
    }
}

impl fmt::Display for Destino {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destino::Cocina => write!(f, "cocina"),
            Destino::Bar => write!(f, "bar"),
        }
    }
}

/// Línea de comanda: solo lo que cocina o bar necesitan leer, sin precios.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ComandaItem {
    pub producto: String,
    pub cantidad: u32,
    #[serde(default)]
    pub modificadores: Vec<String>,
    #[serde(default)]
    pub notas: Option<String>,
}

/// Comanda de cocina o bar generada en el cliente al enviar una orden.
/// Cada envío produce como máximo una comanda por destino, con únicamente
/// las líneas nuevas de ese envío.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comanda {
    pub id: Uuid,
    pub orden_id: Uuid,
    pub mesa_numero: u32,
    pub fecha_hora: DateTime<Utc>,
    pub destino: Destino,
    pub items: Vec<ComandaItem>,
    #[serde(default)]
    pub numero_comensales: Option<u32>,
    #[serde(default)]
    pub mesero: Option<String>,
}
