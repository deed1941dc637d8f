use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use comandero::api::{self, productos::FiltroProductos, ApiClient};
use comandero::borrador::{OrdenBorrador, SeleccionModificadores};
use comandero::config::Config;
use comandero::models::{
    Destino, EstadoMesa, MesaEstadisticas, MesaRestaurante, ProductoConModificadores,
};
use comandero::{printing, servicio, Comandero};

#[derive(Parser, Debug)]
#[command(name = "comandero", about = "Cliente de punto de venta para restaurante")]
struct Cli {
    #[command(subcommand)]
    comando: Comando,
}

#[derive(Subcommand, Debug)]
enum Comando {
    /// Inicia sesión contra el backend
    Login {
        #[arg(long)]
        usuario: String,
        #[arg(long)]
        clave: String,
        /// No recordar el token entre ejecuciones
        #[arg(long)]
        no_recordar: bool,
    },
    /// Cierra la sesión local
    Logout,
    /// Muestra el usuario autenticado
    QuienSoy,
    /// Define el restaurante y el cliente de trabajo
    Contexto {
        #[arg(long)]
        restaurante: Option<Uuid>,
        #[arg(long)]
        cliente: Option<Uuid>,
    },
    /// Estado de las mesas del restaurante
    Mesas,
    /// Asigna una mesa disponible y abre un borrador de orden
    Asignar {
        /// Número de mesa
        mesa: u32,
        #[arg(long)]
        comensales: u32,
    },
    /// Reabre la orden activa de una mesa ocupada
    Reabrir { mesa: u32 },
    /// Catálogo de categorías y productos
    Menu {
        /// Filtra por nombre de categoría
        #[arg(long)]
        categoria: Option<String>,
        /// Busca por nombre o descripción de producto
        #[arg(long)]
        buscar: Option<String>,
    },
    /// Agrega un producto al borrador
    Agregar {
        producto: Uuid,
        #[arg(long, default_value_t = 1)]
        cantidad: u32,
        #[arg(long)]
        nota: Option<String>,
        /// Opción elegida por grupo, en la forma modificador=opcion (UUIDs)
        #[arg(long = "opcion")]
        opciones: Vec<String>,
    },
    /// Muestra el borrador actual
    Orden,
    /// Cambia la cantidad de una línea del borrador
    Cantidad { linea: usize, cantidad: u32 },
    /// Quita una línea del borrador
    Quitar { linea: usize },
    /// Envía la comanda: sincroniza las líneas y genera los documentos
    Enviar {
        /// Carpeta donde dejar los HTML de las comandas
        #[arg(long)]
        comandas_dir: Option<PathBuf>,
    },
    /// Libera una mesa ocupada
    Liberar { mesa: u32 },
}

/// Restaurante y cliente con los que trabaja esta terminal.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ContextoCli {
    restaurante_id: Option<Uuid>,
    cliente_id: Option<Uuid>,
}

impl ContextoCli {
    fn ruta(data_dir: &Path) -> PathBuf {
        data_dir.join("contexto.json")
    }

    fn cargar(data_dir: &Path) -> Self {
        fs::read_to_string(Self::ruta(data_dir))
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    fn guardar(&self, data_dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(data_dir)?;
        fs::write(Self::ruta(data_dir), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn restaurante(&self) -> anyhow::Result<Uuid> {
        self.restaurante_id
            .ok_or_else(|| anyhow!("Define primero el restaurante: comandero contexto --restaurante <id>"))
    }

    fn cliente(&self) -> anyhow::Result<Uuid> {
        self.cliente_id
            .ok_or_else(|| anyhow!("Define primero el cliente: comandero contexto --cliente <id>"))
    }
}

fn ruta_borrador(data_dir: &Path) -> PathBuf {
    data_dir.join("borrador.json")
}

fn cargar_borrador(data_dir: &Path) -> anyhow::Result<OrdenBorrador> {
    let ruta = ruta_borrador(data_dir);
    let json = fs::read_to_string(&ruta)
        .with_context(|| "No hay un borrador abierto. Asigna o reabre una mesa primero")?;
    serde_json::from_str(&json).context("El borrador guardado está corrupto")
}

fn guardar_borrador(data_dir: &Path, borrador: &OrdenBorrador) -> anyhow::Result<()> {
    fs::create_dir_all(data_dir)?;
    fs::write(
        ruta_borrador(data_dir),
        serde_json::to_string_pretty(borrador)?,
    )?;
    Ok(())
}

fn borrar_borrador(data_dir: &Path) {
    let _ = fs::remove_file(ruta_borrador(data_dir));
}

async fn buscar_mesa(
    api: &ApiClient,
    restaurante_id: Uuid,
    numero: u32,
) -> anyhow::Result<MesaRestaurante> {
    let mesas = api::mesas::listar_por_restaurante(api, restaurante_id, 0, 1000).await?;
    mesas
        .data
        .into_iter()
        .find(|m| m.numero_mesa == numero)
        .ok_or_else(|| anyhow!("No existe la mesa {numero} en este restaurante"))
}

fn etiqueta_estado(estado: EstadoMesa) -> &'static str {
    match estado {
        EstadoMesa::Disponible => "disponible",
        EstadoMesa::Ocupada => "ocupada",
        EstadoMesa::Reservada => "reservada",
    }
}

fn imprimir_borrador(borrador: &OrdenBorrador) {
    println!(
        "Mesa {} · {} comensales · orden {}",
        borrador.mesa_numero,
        borrador.numero_comensales,
        borrador.orden_id
    );
    if borrador.esta_vacio() {
        println!("  (sin productos)");
        return;
    }
    for (i, item) in borrador.items().iter().enumerate() {
        let linea = item.linea();
        let marca = if item.es_nuevo() { "nuevo" } else { "enviado" };
        println!(
            "  {}. {:<30} x{:<3} ${:>8.2}  [{} · {}]",
            i + 1,
            linea.nombre_producto,
            linea.cantidad,
            linea.subtotal,
            linea.destino,
            marca
        );
        for m in &linea.modificadores {
            println!("       - {}: {}", m.nombre_modificador, m.nombre_opcion);
        }
        if let Some(nota) = &linea.notas {
            println!("       Nota: {nota}");
        }
    }
    println!("  Total: ${:.2}", borrador.total());
}

fn parsear_opciones(opciones: &[String]) -> anyhow::Result<SeleccionModificadores> {
    let mut seleccion = SeleccionModificadores::new();
    for par in opciones {
        let (modificador, opcion) = par
            .split_once('=')
            .ok_or_else(|| anyhow!("Opción inválida '{par}', usa modificador=opcion"))?;
        seleccion.insert(
            modificador.trim().parse().context("Id de modificador inválido")?,
            opcion.trim().parse().context("Id de opción inválido")?,
        );
    }
    Ok(seleccion)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let app = Comandero::nuevo(Config::desde_entorno())?;
    let data_dir = app.config().data_dir.clone();
    let contexto = ContextoCli::cargar(&data_dir);
    let api = app.api();

    match cli.comando {
        Comando::Login {
            usuario,
            clave,
            no_recordar,
        } => {
            api::auth::iniciar_sesion(api, &usuario, &clave, !no_recordar).await?;
            let yo = api::auth::usuario_actual(api).await?;
            println!(
                "Sesión iniciada como {}",
                yo.full_name.as_deref().unwrap_or(&yo.email)
            );
        }
        Comando::Logout => {
            api::auth::cerrar_sesion(api);
            println!("Sesión cerrada");
        }
        Comando::QuienSoy => {
            let yo = api::auth::usuario_actual(api).await?;
            println!(
                "{} <{}>{}",
                yo.full_name.as_deref().unwrap_or("(sin nombre)"),
                yo.email,
                if yo.is_superuser { " · superusuario" } else { "" }
            );
        }
        Comando::Contexto {
            restaurante,
            cliente,
        } => {
            let mut contexto = contexto;
            if restaurante.is_some() {
                contexto.restaurante_id = restaurante;
            }
            if cliente.is_some() {
                contexto.cliente_id = cliente;
            }
            contexto.guardar(&data_dir)?;
            println!(
                "Restaurante: {}",
                contexto
                    .restaurante_id
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "(sin definir)".into())
            );
            println!(
                "Cliente:     {}",
                contexto
                    .cliente_id
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "(sin definir)".into())
            );
        }
        Comando::Mesas => {
            let restaurante_id = contexto.restaurante()?;
            let mesas = api::mesas::listar_por_restaurante(api, restaurante_id, 0, 1000).await?;
            let stats = MesaEstadisticas::de(&mesas.data);
            println!(
                "Mesas: {} · disponibles {} · ocupadas {} · reservadas {}",
                stats.total, stats.disponibles, stats.ocupadas, stats.reservadas
            );
            for mesa in &mesas.data {
                let detalle = match mesa.estado {
                    EstadoMesa::Ocupada => format!(
                        " · {} comensales · orden {}",
                        mesa.numero_comensales.unwrap_or(0),
                        mesa.orden_activa_id
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "?".into())
                    ),
                    _ => String::new(),
                };
                println!(
                    "  Mesa {:>3} ({} personas): {}{}",
                    mesa.numero_mesa,
                    mesa.capacidad,
                    etiqueta_estado(mesa.estado),
                    detalle
                );
            }
        }
        Comando::Asignar { mesa, comensales } => {
            let restaurante_id = contexto.restaurante()?;
            let cliente_id = contexto.cliente()?;
            let mesa = buscar_mesa(api, restaurante_id, mesa).await?;
            let borrador = servicio::asignar_mesa(api, &mesa, comensales, cliente_id).await?;
            guardar_borrador(&data_dir, &borrador)?;
            println!(
                "Mesa {} asignada ({} comensales). Borrador abierto.",
                borrador.mesa_numero, borrador.numero_comensales
            );
        }
        Comando::Reabrir { mesa } => {
            let restaurante_id = contexto.restaurante()?;
            let mesa = buscar_mesa(api, restaurante_id, mesa).await?;
            let borrador = servicio::reabrir_mesa(api, &mesa).await?;
            guardar_borrador(&data_dir, &borrador)?;
            imprimir_borrador(&borrador);
        }
        Comando::Menu { categoria, buscar } => {
            let restaurante_id = contexto.restaurante()?;
            let categorias =
                api::productos::listar_categorias(api, Some(restaurante_id), 0, 1000).await?;
            for cat in &categorias.data {
                if let Some(filtro) = &categoria {
                    if !cat.nombre.to_lowercase().contains(&filtro.to_lowercase()) {
                        continue;
                    }
                }
                println!("{} [{}]", cat.nombre, Destino::para_categoria(cat));
                let filtro = FiltroProductos {
                    categoria_id: Some(cat.id),
                    ..Default::default()
                };
                let productos = api::productos::listar(api, &filtro).await?;
                let visibles = match &buscar {
                    Some(texto) => api::productos::filtrar_por_texto(&productos.data, texto),
                    None => productos.data.iter().collect(),
                };
                for producto in visibles {
                    println!(
                        "  {}  ${:<8.2} {}",
                        producto.id, producto.precio, producto.nombre
                    );
                }
            }
        }
        Comando::Agregar {
            producto,
            cantidad,
            nota,
            opciones,
        } => {
            let mut borrador = cargar_borrador(&data_dir)?;
            let seleccion = parsear_opciones(&opciones)?;

            // El endpoint de modificadores es opcional en backends viejos.
            let con_modificadores =
                match api::productos::obtener_con_modificadores(api, producto).await {
                    Ok(p) => p,
                    Err(_) => ProductoConModificadores::sin_modificadores(
                        api::productos::obtener(api, producto).await?,
                    ),
                };

            let destino =
                match api::productos::obtener_categoria(api, con_modificadores.producto.categoria_id)
                    .await
                {
                    Ok(cat) => Destino::para_categoria(&cat),
                    Err(_) => Destino::Cocina,
                };

            borrador
                .agregar_producto(&con_modificadores, cantidad, &seleccion, nota, destino)
                .map_err(|e| anyhow!("{e}"))?;
            guardar_borrador(&data_dir, &borrador)?;
            imprimir_borrador(&borrador);
        }
        Comando::Orden => {
            let borrador = cargar_borrador(&data_dir)?;
            imprimir_borrador(&borrador);
        }
        Comando::Cantidad { linea, cantidad } => {
            if linea == 0 {
                bail!("Las líneas empiezan en 1");
            }
            let mut borrador = cargar_borrador(&data_dir)?;
            borrador
                .cambiar_cantidad(linea - 1, cantidad)
                .map_err(|e| anyhow!("{e}"))?;
            guardar_borrador(&data_dir, &borrador)?;
            imprimir_borrador(&borrador);
        }
        Comando::Quitar { linea } => {
            if linea == 0 {
                bail!("Las líneas empiezan en 1");
            }
            let mut borrador = cargar_borrador(&data_dir)?;
            let quitado = borrador.quitar(linea - 1).map_err(|e| anyhow!("{e}"))?;
            guardar_borrador(&data_dir, &borrador)?;
            println!("Quitado: {}", quitado.linea().nombre_producto);
            imprimir_borrador(&borrador);
        }
        Comando::Enviar { comandas_dir } => {
            let mut borrador = cargar_borrador(&data_dir)?;
            let mesero = api::auth::usuario_actual(api)
                .await
                .ok()
                .and_then(|u| u.full_name.or(Some(u.email)));

            let resumen = servicio::enviar_comanda(api, &mut borrador, mesero).await?;
            guardar_borrador(&data_dir, &borrador)?;

            println!(
                "Líneas creadas: {} · actualizadas: {}",
                resumen.creados.len(),
                resumen.actualizados.len()
            );
            for fallo in &resumen.fallidos {
                println!("  FALLÓ {}: {}", fallo.nombre_producto, fallo.error);
            }
            if let Some(error) = &resumen.error_orden {
                println!("  No se pudo actualizar la orden: {error}");
            }
            if let Some(orden) = &resumen.orden {
                println!("Orden en proceso, total ${:.2}", orden.total);
            }

            let dir = comandas_dir.unwrap_or_else(|| data_dir.join("comandas"));
            for comanda in &resumen.comandas {
                let ruta = printing::guardar_comanda_html(comanda, &dir)?;
                println!(
                    "Comanda de {} ({} líneas): {}",
                    comanda.destino,
                    comanda.items.len(),
                    ruta.display()
                );
            }
            if !resumen.exito_total() {
                bail!("El envío terminó con errores; revisa las líneas fallidas");
            }
        }
        Comando::Liberar { mesa } => {
            let restaurante_id = contexto.restaurante()?;
            let encontrada = buscar_mesa(api, restaurante_id, mesa).await?;
            servicio::liberar_mesa(api, encontrada.id).await?;

            // Recarga completa: el estado que vale es el del backend.
            let mesas = api::mesas::listar_por_restaurante(api, restaurante_id, 0, 1000).await?;
            if let Some(actual) = mesas.data.iter().find(|m| m.id == encontrada.id) {
                println!("Mesa {} ahora {}", actual.numero_mesa, etiqueta_estado(actual.estado));
            }
            if let Ok(borrador) = cargar_borrador(&data_dir) {
                if borrador.mesa_id == encontrada.id {
                    borrar_borrador(&data_dir);
                }
            }
        }
    }

    Ok(())
}
