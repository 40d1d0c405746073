//! # Selección de asientos
//!
//! Cola acotada: se pueden elegir hasta `boletos` asientos; al exceder el
//! límite se desaloja la selección más antigua.

use std::collections::{BTreeMap, VecDeque};
use std::fmt::Write as _;

use crate::api::{AppError, AppResult};
use crate::models::{Asiento, Id};

/// Resultado de alternar un asiento
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cambio<T> {
    Agregado(T),
    Quitado(T),
    Reemplazado { agregado: T, desalojado: T },
}

#[derive(Debug, Clone)]
pub struct SeleccionAsientos<T = Id> {
    boletos: usize,
    seleccion: VecDeque<T>,
}

impl<T: PartialEq + Clone> SeleccionAsientos<T> {
    pub fn new(boletos: usize) -> AppResult<Self> {
        if boletos == 0 {
            return Err(AppError::validation_field(
                "boletos",
                "Debe comprar al menos un boleto",
            ));
        }

        Ok(Self {
            boletos,
            seleccion: VecDeque::with_capacity(boletos),
        })
    }

    /// Marca o desmarca un asiento
    pub fn alternar(&mut self, asiento: T) -> Cambio<T> {
        if let Some(pos) = self.seleccion.iter().position(|s| *s == asiento) {
            self.seleccion.remove(pos);
            return Cambio::Quitado(asiento);
        }

        if self.seleccion.len() < self.boletos {
            self.seleccion.push_back(asiento.clone());
            return Cambio::Agregado(asiento);
        }

        // len == boletos >= 1, siempre hay un primero
        match self.seleccion.pop_front() {
            Some(desalojado) => {
                self.seleccion.push_back(asiento.clone());
                Cambio::Reemplazado {
                    agregado: asiento,
                    desalojado,
                }
            }
            None => {
                self.seleccion.push_back(asiento.clone());
                Cambio::Agregado(asiento)
            }
        }
    }

    pub fn contiene(&self, asiento: &T) -> bool {
        self.seleccion.contains(asiento)
    }

    /// Asientos en el orden en que se eligieron
    pub fn seleccionados(&self) -> Vec<T> {
        self.seleccion.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.seleccion.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seleccion.is_empty()
    }

    pub fn boletos(&self) -> usize {
        self.boletos
    }

    pub fn completa(&self) -> bool {
        self.seleccion.len() == self.boletos
    }
}

impl SeleccionAsientos<Id> {
    /// Alterna un asiento del inventario; los ocupados no se pueden elegir
    pub fn alternar_asiento(&mut self, asiento: &Asiento) -> AppResult<Cambio<Id>> {
        if !asiento.libre() && !self.contiene(&asiento.id_asiento) {
            tracing::warn!(asiento = %asiento.etiqueta(), "Intento de elegir asiento ocupado");
            return Err(AppError::Conflict(format!(
                "El asiento {} ya está ocupado",
                asiento.etiqueta()
            )));
        }
        Ok(self.alternar(asiento.id_asiento))
    }
}

/// Inventario de una sala agrupado por fila
#[derive(Debug, Clone)]
pub struct MapaAsientos {
    filas: BTreeMap<String, Vec<Asiento>>,
}

impl MapaAsientos {
    pub fn new(asientos: Vec<Asiento>) -> Self {
        let mut filas: BTreeMap<String, Vec<Asiento>> = BTreeMap::new();
        for asiento in asientos {
            filas
                .entry(asiento.fila.to_uppercase())
                .or_default()
                .push(asiento);
        }
        for fila in filas.values_mut() {
            fila.sort_by_key(|a| a.numero);
        }
        Self { filas }
    }

    /// Busca por etiqueta `FILA-NUMERO`, sin distinguir mayúsculas
    pub fn buscar(&self, etiqueta: &str) -> Option<&Asiento> {
        let (fila, numero) = etiqueta.trim().rsplit_once('-')?;
        let numero: u32 = numero.trim().parse().ok()?;
        self.filas
            .get(&fila.trim().to_uppercase())?
            .iter()
            .find(|a| a.numero == numero)
    }

    pub fn por_id(&self, id: Id) -> Option<&Asiento> {
        self.asientos().find(|a| a.id_asiento == id)
    }

    pub fn asientos(&self) -> impl Iterator<Item = &Asiento> {
        self.filas.values().flatten()
    }

    pub fn libres(&self) -> usize {
        self.asientos().filter(|a| a.libre()).count()
    }

    pub fn total(&self) -> usize {
        self.asientos().count()
    }

    /// Cuadrícula de texto: `[ 3]` libre, `[X3]` ocupado, `[*3]` seleccionado
    pub fn render(&self, seleccion: &SeleccionAsientos<Id>) -> String {
        let mut salida = String::new();
        for (fila, asientos) in &self.filas {
            let _ = write!(salida, "{:>3} ", fila);
            for asiento in asientos {
                let marca = if seleccion.contiene(&asiento.id_asiento) {
                    '*'
                } else if asiento.libre() {
                    ' '
                } else {
                    'X'
                };
                let _ = write!(salida, "[{}{:>2}]", marca, asiento.numero);
            }
            salida.push('\n');
        }
        salida
    }
}
