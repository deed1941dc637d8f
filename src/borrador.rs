//! Orden en borrador: el estado que vive en el cliente entre "agregar
//! producto" y "enviar comanda".
//!
//! Cada línea es un [`ItemBorrador`]: `Nuevo` mientras el backend no la
//! conoce, `Persistido` cuando ya tiene id del servidor. La distinción es
//! del sistema de tipos, no de un prefijo en el id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Destino, ModificadorSeleccionado, OrdenItemDetallado, ProductoConModificadores,
    TipoModificador,
};

/// Selección cruda del mesero: grupo → opción elegida.
pub type SeleccionModificadores = BTreeMap<Uuid, Uuid>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BorradorError {
    /// Grupos obligatorios sin elegir, por nombre, para mostrarlos tal cual.
    #[error("Por favor selecciona: {}", faltantes.join(", "))]
    ModificadoresFaltantes { faltantes: Vec<String> },

    #[error("La línea {0} no existe en el borrador")]
    LineaInvalida(usize),
}

/// Contenido común de una línea, tenga o no id del servidor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineaBorrador {
    pub producto_id: Uuid,
    pub nombre_producto: String,
    pub cantidad: u32,
    pub precio_unitario: f64,
    pub subtotal: f64,
    pub notas: Option<String>,
    #[serde(default)]
    pub modificadores: Vec<ModificadorSeleccionado>,
    pub destino: Destino,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum ItemBorrador {
    /// Creado en el cliente, todavía sin enviar.
    Nuevo { id_local: Uuid, linea: LineaBorrador },
    /// Ya existe en el backend; `modificado` marca si hay cambios sin enviar.
    Persistido {
        id: Uuid,
        linea: LineaBorrador,
        modificado: bool,
    },
}

impl ItemBorrador {
    pub fn linea(&self) -> &LineaBorrador {
        match self {
            ItemBorrador::Nuevo { linea, .. } => linea,
            ItemBorrador::Persistido { linea, .. } => linea,
        }
    }

    pub fn es_nuevo(&self) -> bool {
        matches!(self, ItemBorrador::Nuevo { .. })
    }

    fn linea_mut(&mut self) -> &mut LineaBorrador {
        match self {
            ItemBorrador::Nuevo { linea, .. } => linea,
            ItemBorrador::Persistido {
                linea, modificado, ..
            } => {
                *modificado = true;
                linea
            }
        }
    }
}

/// Borrador de la orden de una mesa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdenBorrador {
    pub orden_id: Uuid,
    pub mesa_id: Uuid,
    pub mesa_numero: u32,
    pub numero_comensales: u32,
    items: Vec<ItemBorrador>,
}

impl OrdenBorrador {
    pub fn nuevo(orden_id: Uuid, mesa_id: Uuid, mesa_numero: u32, numero_comensales: u32) -> Self {
        OrdenBorrador {
            orden_id,
            mesa_id,
            mesa_numero,
            numero_comensales,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[ItemBorrador] {
        &self.items
    }

    pub fn esta_vacio(&self) -> bool {
        self.items.is_empty()
    }

    /// Agrega un producto validando antes sus modificadores obligatorios.
    /// El precio unitario queda congelado en la línea: base más recargos.
    pub fn agregar_producto(
        &mut self,
        producto: &ProductoConModificadores,
        cantidad: u32,
        seleccion: &SeleccionModificadores,
        notas: Option<String>,
        destino: Destino,
    ) -> Result<&ItemBorrador, BorradorError> {
        let modificadores = validar_modificadores(producto, seleccion)?;
        let cantidad = cantidad.max(1);
        let precio_unitario = precio_unitario(producto.producto.precio, &modificadores);

        let linea = LineaBorrador {
            producto_id: producto.producto.id,
            nombre_producto: producto.producto.nombre.clone(),
            cantidad,
            precio_unitario,
            subtotal: precio_unitario * cantidad as f64,
            notas,
            modificadores,
            destino,
        };
        self.items.push(ItemBorrador::Nuevo {
            id_local: Uuid::new_v4(),
            linea,
        });
        Ok(self.items.last().expect("recién insertado"))
    }

    /// Incorpora líneas que ya existen en el backend (al reabrir una mesa
    /// ocupada). Entran como `Persistido` sin cambios pendientes.
    pub fn cargar_persistido(&mut self, item: &OrdenItemDetallado, destino: Destino) {
        let linea = LineaBorrador {
            producto_id: item.producto_id,
            nombre_producto: item
                .producto_nombre
                .clone()
                .unwrap_or_else(|| "Producto".to_string()),
            cantidad: item.cantidad,
            precio_unitario: item.precio_unitario,
            subtotal: item.precio_unitario * item.cantidad as f64,
            notas: item.notas.clone(),
            modificadores: Vec::new(),
            destino,
        };
        self.items.push(ItemBorrador::Persistido {
            id: item.id,
            linea,
            modificado: false,
        });
    }

    /// Fija la cantidad de una línea. Nunca baja de 1; el subtotal se
    /// recalcula en el momento.
    pub fn cambiar_cantidad(&mut self, indice: usize, cantidad: u32) -> Result<(), BorradorError> {
        let item = self
            .items
            .get_mut(indice)
            .ok_or(BorradorError::LineaInvalida(indice))?;
        let linea = item.linea_mut();
        linea.cantidad = cantidad.max(1);
        linea.subtotal = linea.precio_unitario * linea.cantidad as f64;
        Ok(())
    }

    pub fn incrementar(&mut self, indice: usize) -> Result<(), BorradorError> {
        let actual = self
            .items
            .get(indice)
            .ok_or(BorradorError::LineaInvalida(indice))?
            .linea()
            .cantidad;
        self.cambiar_cantidad(indice, actual + 1)
    }

    /// El control de decremento del borrador se detiene en 1; quitar la
    /// línea es una acción aparte.
    pub fn decrementar(&mut self, indice: usize) -> Result<(), BorradorError> {
        let actual = self
            .items
            .get(indice)
            .ok_or(BorradorError::LineaInvalida(indice))?
            .linea()
            .cantidad;
        self.cambiar_cantidad(indice, actual.saturating_sub(1))
    }

    pub fn quitar(&mut self, indice: usize) -> Result<ItemBorrador, BorradorError> {
        if indice >= self.items.len() {
            return Err(BorradorError::LineaInvalida(indice));
        }
        Ok(self.items.remove(indice))
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.linea().subtotal).sum()
    }

    pub fn nuevos(&self) -> impl Iterator<Item = (&Uuid, &LineaBorrador)> {
        self.items.iter().filter_map(|item| match item {
            ItemBorrador::Nuevo { id_local, linea } => Some((id_local, linea)),
            ItemBorrador::Persistido { .. } => None,
        })
    }

    pub fn persistidos_modificados(&self) -> impl Iterator<Item = (&Uuid, &LineaBorrador)> {
        self.items.iter().filter_map(|item| match item {
            ItemBorrador::Persistido {
                id,
                linea,
                modificado: true,
            } => Some((id, linea)),
            _ => None,
        })
    }

    /// Promueve una línea nueva a persistida con el id que emitió el
    /// servidor. Así un reenvío posterior ya no puede duplicarla.
    pub fn confirmar_nuevo(&mut self, id_local: Uuid, id_servidor: Uuid) -> bool {
        for item in &mut self.items {
            let coincide = matches!(item, ItemBorrador::Nuevo { id_local: id, .. } if *id == id_local);
            if coincide {
                let linea = item.linea().clone();
                *item = ItemBorrador::Persistido {
                    id: id_servidor,
                    linea,
                    modificado: false,
                };
                return true;
            }
        }
        false
    }

    /// Marca como sincronizada una línea persistida cuyos cambios ya
    /// aceptó el servidor.
    pub fn confirmar_persistido(&mut self, id_servidor: Uuid) -> bool {
        for item in &mut self.items {
            if let ItemBorrador::Persistido { id, modificado, .. } = item {
                if *id == id_servidor {
                    *modificado = false;
                    return true;
                }
            }
        }
        false
    }

    /// Destino conocido de cada producto presente en el borrador.
    pub fn destinos_por_producto(&self) -> std::collections::HashMap<Uuid, Destino> {
        self.items
            .iter()
            .map(|i| (i.linea().producto_id, i.linea().destino))
            .collect()
    }

    /// Reemplaza todas las líneas por el estado autoritativo del servidor.
    /// Es el paso final del envío: después de esto no queda ningún `Nuevo`.
    pub fn reconciliar(&mut self, items: Vec<(OrdenItemDetallado, Destino)>) {
        self.items.clear();
        for (item, destino) in items {
            self.cargar_persistido(&item, destino);
        }
    }
}

/// Valida la selección contra los grupos del producto. Falla listando por
/// nombre cada grupo obligatorio sin opción; los opcionales pueden quedar
/// en blanco. Devuelve las selecciones desnormalizadas para la línea.
pub fn validar_modificadores(
    producto: &ProductoConModificadores,
    seleccion: &SeleccionModificadores,
) -> Result<Vec<ModificadorSeleccionado>, BorradorError> {
    let faltantes: Vec<String> = producto
        .modificadores
        .iter()
        .filter(|m| m.tipo == TipoModificador::Obligatorio && !seleccion.contains_key(&m.id))
        .map(|m| m.nombre.clone())
        .collect();
    if !faltantes.is_empty() {
        return Err(BorradorError::ModificadoresFaltantes { faltantes });
    }

    let mut elegidos = Vec::new();
    for (modificador_id, opcion_id) in seleccion {
        let Some(modificador) = producto
            .modificadores
            .iter()
            .find(|m| m.id == *modificador_id)
        else {
            continue;
        };
        let Some(opcion) = modificador.opciones.iter().find(|o| o.id == *opcion_id) else {
            continue;
        };
        elegidos.push(ModificadorSeleccionado {
            modificador_id: *modificador_id,
            opcion_id: *opcion_id,
            nombre_modificador: modificador.nombre.clone(),
            nombre_opcion: opcion.nombre.clone(),
            precio_adicional: opcion.precio_adicional.unwrap_or(0.0),
        });
    }
    Ok(elegidos)
}

/// Precio por unidad: base del producto más los recargos elegidos.
pub fn precio_unitario(base: f64, modificadores: &[ModificadorSeleccionado]) -> f64 {
    base + modificadores
        .iter()
        .map(|m| m.precio_adicional)
        .sum::<f64>()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::{Modificador, ModificadorOpcion, Producto};

    fn producto_base(precio: f64) -> Producto {
        Producto {
            id: Uuid::new_v4(),
            nombre: "Lomo saltado".to_string(),
            descripcion: None,
            precio,
            stock: 10,
            imagen: None,
            categoria_id: Uuid::new_v4(),
            restaurante_id: Uuid::new_v4(),
            empresa_id: Uuid::new_v4(),
            tasa_impositiva_id: None,
        }
    }

    fn grupo(
        nombre: &str,
        tipo: TipoModificador,
        opciones: &[(&str, Option<f64>)],
        producto_id: Uuid,
    ) -> Modificador {
        Modificador {
            id: Uuid::new_v4(),
            nombre: nombre.to_string(),
            tipo,
            opciones: opciones
                .iter()
                .map(|(nombre, recargo)| ModificadorOpcion {
                    id: Uuid::new_v4(),
                    nombre: nombre.to_string(),
                    precio_adicional: *recargo,
                })
                .collect(),
            producto_id,
        }
    }

    fn borrador() -> OrdenBorrador {
        OrdenBorrador::nuevo(Uuid::new_v4(), Uuid::new_v4(), 5, 2)
    }

    #[test]
    fn precio_base_mas_recargos_por_cantidad() {
        // base $10, recargos +$2 y +$1, cantidad 3 => total $39
        let producto = producto_base(10.0);
        let tamano = grupo(
            "Tamaño",
            TipoModificador::Obligatorio,
            &[("Grande", Some(2.0))],
            producto.id,
        );
        let extra = grupo(
            "Extra",
            TipoModificador::Opcional,
            &[("Queso", Some(1.0))],
            producto.id,
        );
        let mut seleccion = SeleccionModificadores::new();
        seleccion.insert(tamano.id, tamano.opciones[0].id);
        seleccion.insert(extra.id, extra.opciones[0].id);

        let con_mods = ProductoConModificadores {
            producto,
            modificadores: vec![tamano, extra],
        };

        let mut orden = borrador();
        orden
            .agregar_producto(&con_mods, 3, &seleccion, None, Destino::Cocina)
            .unwrap();

        let linea = orden.items()[0].linea();
        assert_eq!(linea.precio_unitario, 13.0);
        assert_eq!(linea.subtotal, 39.0);
        assert_eq!(orden.total(), 39.0);
    }

    #[test]
    fn obligatorios_sin_elegir_bloquean_listando_nombres() {
        let producto = producto_base(8.0);
        let termino = grupo(
            "Término",
            TipoModificador::Obligatorio,
            &[("Medio", None)],
            producto.id,
        );
        let salsa = grupo(
            "Salsa",
            TipoModificador::Obligatorio,
            &[("Ají", Some(0.5))],
            producto.id,
        );
        let con_mods = ProductoConModificadores {
            producto,
            modificadores: vec![termino, salsa],
        };

        let mut orden = borrador();
        let error = orden
            .agregar_producto(
                &con_mods,
                1,
                &SeleccionModificadores::new(),
                None,
                Destino::Cocina,
            )
            .unwrap_err();

        assert_eq!(
            error,
            BorradorError::ModificadoresFaltantes {
                faltantes: vec!["Término".to_string(), "Salsa".to_string()],
            }
        );
        assert!(error.to_string().contains("Término"));
        assert!(error.to_string().contains("Salsa"));
    }

    #[test]
    fn opcionales_en_blanco_no_bloquean() {
        let producto = producto_base(8.0);
        let termino = grupo(
            "Término",
            TipoModificador::Obligatorio,
            &[("Medio", None)],
            producto.id,
        );
        let extra = grupo(
            "Extras",
            TipoModificador::Opcional,
            &[("Tocino", Some(1.5))],
            producto.id,
        );
        let mut seleccion = SeleccionModificadores::new();
        seleccion.insert(termino.id, termino.opciones[0].id);

        let con_mods = ProductoConModificadores {
            producto,
            modificadores: vec![termino, extra],
        };

        let mut orden = borrador();
        let item = orden
            .agregar_producto(&con_mods, 1, &seleccion, None, Destino::Cocina)
            .unwrap();
        // Sin recargo del opcional no elegido.
        assert_eq!(item.linea().precio_unitario, 8.0);
    }

    #[test]
    fn la_cantidad_nunca_baja_de_uno() {
        let producto = ProductoConModificadores::sin_modificadores(producto_base(5.0));
        let mut orden = borrador();
        orden
            .agregar_producto(
                &producto,
                1,
                &SeleccionModificadores::new(),
                None,
                Destino::Bar,
            )
            .unwrap();

        orden.decrementar(0).unwrap();
        assert_eq!(orden.items()[0].linea().cantidad, 1);

        orden.cambiar_cantidad(0, 0).unwrap();
        assert_eq!(orden.items()[0].linea().cantidad, 1);
    }

    #[test]
    fn cambiar_cantidad_recalcula_el_subtotal() {
        let producto = ProductoConModificadores::sin_modificadores(producto_base(4.5));
        let mut orden = borrador();
        orden
            .agregar_producto(
                &producto,
                2,
                &SeleccionModificadores::new(),
                None,
                Destino::Cocina,
            )
            .unwrap();
        assert_eq!(orden.total(), 9.0);

        orden.incrementar(0).unwrap();
        assert_eq!(orden.items()[0].linea().subtotal, 13.5);
        assert_eq!(orden.total(), 13.5);
    }

    #[test]
    fn editar_un_persistido_lo_marca_modificado() {
        let mut orden = borrador();
        let detallado = OrdenItemDetallado {
            id: Uuid::new_v4(),
            orden_id: orden.orden_id,
            producto_id: Uuid::new_v4(),
            cantidad: 2,
            precio_unitario: 6.0,
            notas: None,
            producto_nombre: Some("Limonada".to_string()),
            producto_descripcion: None,
        };
        orden.cargar_persistido(&detallado, Destino::Bar);
        assert_eq!(orden.persistidos_modificados().count(), 0);

        orden.incrementar(0).unwrap();
        let modificados: Vec<_> = orden.persistidos_modificados().collect();
        assert_eq!(modificados.len(), 1);
        assert_eq!(modificados[0].1.cantidad, 3);
    }

    #[test]
    fn quitar_linea_inexistente_es_error() {
        let mut orden = borrador();
        assert!(matches!(
            orden.quitar(0),
            Err(BorradorError::LineaInvalida(0))
        ));
    }

    #[test]
    fn reconciliar_no_deja_ningun_nuevo() {
        let producto = ProductoConModificadores::sin_modificadores(producto_base(3.0));
        let mut orden = borrador();
        orden
            .agregar_producto(
                &producto,
                1,
                &SeleccionModificadores::new(),
                None,
                Destino::Cocina,
            )
            .unwrap();
        assert_eq!(orden.nuevos().count(), 1);

        let servidor = vec![(
            OrdenItemDetallado {
                id: Uuid::new_v4(),
                orden_id: orden.orden_id,
                producto_id: producto.producto.id,
                cantidad: 1,
                precio_unitario: 3.0,
                notas: None,
                producto_nombre: Some(producto.producto.nombre.clone()),
                producto_descripcion: None,
            },
            Destino::Cocina,
        )];
        orden.reconciliar(servidor);

        assert_eq!(orden.nuevos().count(), 0);
        assert!(orden.items().iter().all(|i| !i.es_nuevo()));
    }
}
