use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::comanda::Destino;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Producto {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub stock: i64,
    pub imagen: Option<String>,
    pub categoria_id: Uuid,
    pub restaurante_id: Uuid,
    pub empresa_id: Uuid,
    pub tasa_impositiva_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductoCreate {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub stock: i64,
    pub imagen: Option<String>,
    pub categoria_id: Uuid,
    pub restaurante_id: Uuid,
    pub empresa_id: Uuid,
    pub tasa_impositiva_id: Option<Uuid>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProductoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurante_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresa_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasa_impositiva_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductosPublic {
    pub data: Vec<Producto>,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductoStockUpdate {
    pub stock: i64,
}

/// Grupo de personalización de un producto (ej. "Tamaño", "Término de la carne").
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Modificador {
    pub id: Uuid,
    pub nombre: String,
    pub tipo: TipoModificador,
    pub opciones: Vec<ModificadorOpcion>,
    pub producto_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TipoModificador {
    Obligatorio,
    Opcional,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModificadorOpcion {
    pub id: Uuid,
    pub nombre: String,
    pub precio_adicional: Option<f64>,
}

/// Opción elegida de un grupo, desnormalizada para conservar nombres y
/// recargo aunque el catálogo cambie después.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModificadorSeleccionado {
    pub modificador_id: Uuid,
    pub opcion_id: Uuid,
    pub nombre_modificador: String,
    pub nombre_opcion: String,
    pub precio_adicional: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductoConModificadores {
    #[serde(flatten)]
    pub producto: Producto,
    #[serde(default)]
    pub modificadores: Vec<Modificador>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Categoria {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub restaurante_id: Uuid,
    /// Categoría padre, si es una subcategoría.
    pub categoria_id: Option<Uuid>,
    /// Destino de impresión de los productos de la categoría. Los backends
    /// antiguos no envían el campo; ver `Destino::para_categoria`.
    #[serde(default)]
    pub destino: Option<Destino>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriaCreate {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub restaurante_id: Uuid,
    pub categoria_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destino: Option<Destino>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoriaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurante_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destino: Option<Destino>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriasPublic {
    pub data: Vec<Categoria>,
    pub count: i64,
}

impl ProductoConModificadores {
    pub fn sin_modificadores(producto: Producto) -> Self {
        ProductoConModificadores {
            producto,
            modificadores: Vec::new(),
        }
    }
}
