//! Generación de comandas imprimibles.
//!
//! El documento HTML es el formato que el propio cliente define: una hoja
//! autocontenida de 80 mm pensada para mandarse directo a imprimir. Para
//! impresoras térmicas también se genera el ticket ESC/POS equivalente.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Comanda, Destino};

/// Columnas de una impresora de 80 mm (42 para 58 mm).
const ANCHO_TICKET: usize = 48;

fn titulo_destino(destino: Destino) -> &'static str {
    match destino {
        Destino::Cocina => "COCINA",
        Destino::Bar => "BAR",
    }
}

/// Referencia corta de un id para encabezados: 8 caracteres en mayúsculas.
fn referencia_corta(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_uppercase()
}

fn formatear_fecha(comanda: &Comanda) -> String {
    comanda.fecha_hora.format("%d/%m/%Y %H:%M").to_string()
}

/// Documento HTML autocontenido de la comanda, listo para imprimirse.
pub fn generar_comanda_html(comanda: &Comanda) -> String {
    let mut filas = String::new();
    for item in &comanda.items {
        let mut detalle = format!("<div><strong>{}</strong></div>", escapar_html(&item.producto));
        if !item.modificadores.is_empty() {
            let lista = item
                .modificadores
                .iter()
                .map(|m| format!("&bull; {}", escapar_html(m)))
                .collect::<Vec<_>>()
                .join("<br>");
            detalle.push_str(&format!("<div class=\"modificadores\">{lista}</div>"));
        }
        if let Some(notas) = &item.notas {
            detalle.push_str(&format!(
                "<div class=\"notas\">NOTA: {}</div>",
                escapar_html(notas)
            ));
        }
        filas.push_str(&format!(
            "<tr class=\"item-row\"><td>{}</td><td>{}</td></tr>\n",
            item.cantidad, detalle
        ));
    }

    let comensales = comanda
        .numero_comensales
        .map(|n| format!("<div class=\"info-row\"><span>Comensales:</span><span>{n}</span></div>"))
        .unwrap_or_default();
    let mesero = comanda
        .mesero
        .as_deref()
        .map(|m| {
            format!(
                "<div class=\"info-row\"><span>Mesero:</span><span>{}</span></div>",
                escapar_html(m)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Comanda {referencia}</title>
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{
      font-family: 'Courier New', monospace;
      width: 80mm;
      padding: 10mm;
      background: white;
      color: black;
      font-size: 12px;
    }}
    .header {{
      text-align: center;
      border-bottom: 2px solid black;
      padding-bottom: 10px;
      margin-bottom: 10px;
    }}
    .header h1 {{ font-size: 24px; font-weight: bold; margin-bottom: 5px; }}
    .header p {{ font-size: 10px; }}
    .info {{ margin-bottom: 10px; }}
    .info-row {{ display: flex; justify-content: space-between; margin-bottom: 3px; }}
    .info-row.mesa span:last-child {{ font-size: 20px; font-weight: bold; }}
    .items {{ border-top: 2px solid black; padding-top: 10px; margin-bottom: 10px; }}
    .items table {{ width: 100%; border-collapse: collapse; }}
    .items th {{ text-align: left; border-bottom: 1px solid black; padding-bottom: 5px; }}
    .item-row {{ border-bottom: 1px dashed #999; }}
    .item-row td {{ padding: 8px 0; vertical-align: top; }}
    .item-row td:first-child {{ font-weight: bold; font-size: 18px; width: 40px; }}
    .modificadores {{ font-size: 10px; margin-top: 3px; margin-left: 10px; }}
    .notas {{
      font-size: 10px;
      font-style: italic;
      margin-top: 3px;
      background: #ffeb3b;
      padding: 3px;
      border-radius: 3px;
    }}
    .footer {{ border-top: 2px solid black; padding-top: 10px; text-align: center; font-size: 10px; }}
    @media print {{
      body {{ padding: 0; }}
      .no-print {{ display: none; }}
    }}
  </style>
</head>
<body>
  <div class="header">
    <h1>{titulo}</h1>
    <p>COMANDA #{referencia}</p>
  </div>

  <div class="info">
    <div class="info-row mesa">
      <span>MESA:</span>
      <span>{mesa}</span>
    </div>
    {comensales}
    {mesero}
    <div class="info-row">
      <span>Fecha:</span>
      <span>{fecha}</span>
    </div>
  </div>

  <div class="items">
    <table>
      <thead>
        <tr>
          <th>CANT</th>
          <th>PRODUCTO</th>
        </tr>
      </thead>
      <tbody>
{filas}      </tbody>
    </table>
  </div>

  <div class="footer">
    <p>*** COMANDA DE {titulo} ***</p>
    <p>Orden: {orden}</p>
  </div>
</body>
</html>
"#,
        referencia = referencia_corta(&comanda.id),
        titulo = titulo_destino(comanda.destino),
        mesa = comanda.mesa_numero,
        comensales = comensales,
        mesero = mesero,
        fecha = formatear_fecha(comanda),
        filas = filas,
        orden = referencia_corta(&comanda.orden_id),
    )
}

/// Guarda el HTML de la comanda en `dir` y devuelve la ruta, lista para
/// mandarse a imprimir.
pub fn guardar_comanda_html(comanda: &Comanda, dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let ruta = dir.join(format!(
        "comanda-{}-{}.html",
        comanda.destino,
        referencia_corta(&comanda.id).to_lowercase()
    ));
    fs::write(&ruta, generar_comanda_html(comanda))?;
    Ok(ruta)
}

/// Ticket ESC/POS de la comanda para impresoras térmicas de 80 mm.
pub fn generar_comanda_ticket(comanda: &Comanda) -> Vec<u8> {
    let mut ticket: Vec<u8> = Vec::new();

    // Comandos ESC/POS
    let esc_init: &[u8] = &[0x1B, 0x40]; // Inicializar impresora
    let esc_center: &[u8] = &[0x1B, 0x61, 0x01]; // Centrar texto
    let esc_left: &[u8] = &[0x1B, 0x61, 0x00]; // Alinear izquierda
    let esc_bold_on: &[u8] = &[0x1B, 0x45, 0x01]; // Negrita on
    let esc_bold_off: &[u8] = &[0x1B, 0x45, 0x00]; // Negrita off
    let esc_double_on: &[u8] = &[0x1B, 0x21, 0x30]; // Doble alto+ancho
    let esc_double_off: &[u8] = &[0x1B, 0x21, 0x00]; // Normal
    let esc_cut: &[u8] = &[0x1D, 0x56, 0x00]; // Corte total
    let esc_feed: &[u8] = &[0x1B, 0x64, 0x04]; // Avanzar 4 líneas

    ticket.extend_from_slice(esc_init);

    // Encabezado: destino y referencia de la comanda
    ticket.extend_from_slice(esc_center);
    ticket.extend_from_slice(esc_double_on);
    ticket.extend_from_slice(titulo_destino(comanda.destino).as_bytes());
    ticket.push(b'\n');
    ticket.extend_from_slice(esc_double_off);
    ticket.extend_from_slice(
        format!("COMANDA #{}\n", referencia_corta(&comanda.id)).as_bytes(),
    );
    ticket.extend_from_slice(esc_left);

    ticket.extend_from_slice(linea_separador(ANCHO_TICKET, '-').as_bytes());

    // Mesa en grande, comensales y mesero
    ticket.extend_from_slice(esc_bold_on);
    ticket.extend_from_slice(esc_double_on);
    ticket.extend_from_slice(format!("MESA {}\n", comanda.mesa_numero).as_bytes());
    ticket.extend_from_slice(esc_double_off);
    ticket.extend_from_slice(esc_bold_off);
    if let Some(comensales) = comanda.numero_comensales {
        ticket.extend_from_slice(format!("Comensales: {comensales}\n").as_bytes());
    }
    if let Some(mesero) = &comanda.mesero {
        ticket.extend_from_slice(format!("Mesero: {mesero}\n").as_bytes());
    }
    ticket.extend_from_slice(format!("Fecha: {}\n", formatear_fecha(comanda)).as_bytes());

    ticket.extend_from_slice(linea_separador(ANCHO_TICKET, '-').as_bytes());

    // Cabecera de detalle
    ticket.extend_from_slice(esc_bold_on);
    ticket.extend_from_slice(format!("{:<5} {}\n", "CANT", "PRODUCTO").as_bytes());
    ticket.extend_from_slice(esc_bold_off);

    for item in &comanda.items {
        ticket.extend_from_slice(esc_bold_on);
        ticket.extend_from_slice(format!("{:<5} {}\n", item.cantidad, item.producto).as_bytes());
        ticket.extend_from_slice(esc_bold_off);
        for modificador in &item.modificadores {
            ticket.extend_from_slice(format!("      - {modificador}\n").as_bytes());
        }
        if let Some(notas) = &item.notas {
            ticket.extend_from_slice(format!("      NOTA: {notas}\n").as_bytes());
        }
    }

    ticket.extend_from_slice(linea_separador(ANCHO_TICKET, '=').as_bytes());
    ticket.extend_from_slice(esc_center);
    ticket.extend_from_slice(
        format!("*** COMANDA DE {} ***\n", titulo_destino(comanda.destino)).as_bytes(),
    );
    ticket.extend_from_slice(
        format!("Orden: {}\n", referencia_corta(&comanda.orden_id)).as_bytes(),
    );
    ticket.extend_from_slice(esc_left);

    ticket.extend_from_slice(esc_feed);
    ticket.extend_from_slice(esc_cut);

    ticket
}

fn linea_separador(ancho: usize, caracter: char) -> String {
    format!("{}\n", caracter.to_string().repeat(ancho))
}

fn escapar_html(texto: &str) -> String {
    texto
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
