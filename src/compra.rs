//! # Compra de boletos
//!
//! 1. [`preparar_seleccion`] descarga el inventario de la sala y arma la
//!    selección a partir de etiquetas `FILA-NUMERO`.
//! 2. [`confirmar_compra`] valida el pago, vuelve a consultar el inventario y,
//!    si todos los asientos siguen libres, los marca `ocupado` en una sola
//!    solicitud.
//!
//! La segunda consulta reduce la ventana de carrera pero no la elimina: el
//! servidor no ofrece una reserva atómica.

use crate::api::{ApiClient, AppError, AppResult, ErrorLogExt};
use crate::domain::validacion::{validar_pago, DatosPago};
use crate::domain::{Boleto, MapaAsientos, PoliticaPrecio, SeleccionAsientos};
use crate::models::{CambioAsiento, EstadoAsiento, Id, Pelicula};

/// Función elegida por el usuario
#[derive(Debug, Clone)]
pub struct Funcion {
    pub pelicula: Pelicula,
    pub id_sala: Id,
    pub nombre_sala: String,
    pub hora: String,
}

/// Arma una selección de `boletos` asientos a partir de sus etiquetas
///
/// Las etiquetas se aplican en orden, así que si hay más etiquetas que
/// boletos quedan las últimas. Una etiqueta repetida (`A-1` y `a-1` cuentan
/// igual) no deselecciona el asiento. La selección debe quedar completa.
pub fn seleccionar(
    mapa: &MapaAsientos,
    boletos: usize,
    etiquetas: &[String],
) -> AppResult<SeleccionAsientos<Id>> {
    let mut seleccion = SeleccionAsientos::new(boletos)?;

    for etiqueta in etiquetas {
        let asiento = mapa
            .buscar(etiqueta)
            .ok_or_else(|| AppError::not_found_id("Asiento", etiqueta))?;
        if seleccion.contiene(&asiento.id_asiento) {
            tracing::debug!(asiento = %asiento.etiqueta(), "Etiqueta repetida, se ignora");
            continue;
        }
        seleccion.alternar_asiento(asiento)?;
    }

    if !seleccion.completa() {
        return Err(AppError::validation_field(
            "asientos",
            &format!(
                "Selecciona {} asiento(s); llevas {}",
                seleccion.boletos(),
                seleccion.len()
            ),
        ));
    }

    Ok(seleccion)
}

/// Descarga el inventario de la sala y arma la selección
pub async fn preparar_seleccion(
    client: &ApiClient,
    id_sala: Id,
    boletos: usize,
    etiquetas: &[String],
) -> AppResult<(MapaAsientos, SeleccionAsientos<Id>)> {
    let mapa = MapaAsientos::new(client.asientos(id_sala).await?);
    let seleccion = seleccionar(&mapa, boletos, etiquetas)?;
    Ok((mapa, seleccion))
}

/// Etiquetas de los asientos seleccionados que ya no están libres
/// (o que desaparecieron del inventario)
pub fn no_disponibles(mapa: &MapaAsientos, ids: &[Id]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| match mapa.por_id(*id) {
            Some(asiento) if asiento.libre() => None,
            Some(asiento) => Some(asiento.etiqueta()),
            None => Some(format!("#{}", id)),
        })
        .collect()
}

/// Verifica el pago y el inventario y marca los asientos como ocupados
pub async fn confirmar_compra(
    client: &ApiClient,
    funcion: &Funcion,
    seleccion: &SeleccionAsientos<Id>,
    pago: &DatosPago,
    politica: &PoliticaPrecio,
) -> AppResult<Boleto> {
    if !seleccion.completa() {
        return Err(AppError::validation_field(
            "asientos",
            "La selección de asientos está incompleta",
        ));
    }
    validar_pago(pago)?;

    let ids = seleccion.seleccionados();
    let mapa = MapaAsientos::new(client.asientos(funcion.id_sala).await?);

    let ocupados = no_disponibles(&mapa, &ids);
    if !ocupados.is_empty() {
        tracing::warn!(
            sala = funcion.id_sala,
            asientos = ?ocupados,
            "Asientos tomados entre la selección y el pago"
        );
        return Err(AppError::Conflict(format!(
            "Los siguientes asientos ya no están disponibles: {}",
            ocupados.join(", ")
        )));
    }

    let cambios = ids
        .iter()
        .map(|id| CambioAsiento {
            id_asiento: *id,
            estado: EstadoAsiento::Ocupado,
        })
        .collect();
    client
        .actualizar_asientos(cambios)
        .await
        .log_error_context("confirmar_compra")?;

    let etiquetas: Vec<String> = ids
        .iter()
        .filter_map(|id| mapa.por_id(*id))
        .map(|asiento| asiento.etiqueta())
        .collect();
    let total = politica.total(&funcion.pelicula, etiquetas.len());

    let boleto = Boleto::new(
        &funcion.pelicula.nombre_pelicula,
        &funcion.nombre_sala,
        &funcion.hora,
        etiquetas,
        total,
    );

    tracing::info!(
        folio = %boleto.folio,
        pelicula = %boleto.pelicula,
        boletos = boleto.boletos,
        total = boleto.total,
        "Compra confirmada"
    );

    Ok(boleto)
}
