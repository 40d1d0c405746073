//! # Cartelera
//!
//! Días de la semana tal como los usa el API y deduplicación de funciones por
//! `horaProgramada`. No hay caché entre días: cada consulta va al servidor.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::api::AppError;
use crate::models::{FuncionDia, Horario, Id};

/// Día de la semana con la etiqueta en español que espera el API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dia {
    Lunes,
    Martes,
    #[serde(rename = "Miércoles")]
    Miercoles,
    Jueves,
    Viernes,
    #[serde(rename = "Sábado")]
    Sabado,
    Domingo,
}

impl Dia {
    pub const TODOS: [Dia; 7] = [
        Dia::Lunes,
        Dia::Martes,
        Dia::Miercoles,
        Dia::Jueves,
        Dia::Viernes,
        Dia::Sabado,
        Dia::Domingo,
    ];

    pub fn etiqueta(&self) -> &'static str {
        match self {
            Dia::Lunes => "Lunes",
            Dia::Martes => "Martes",
            Dia::Miercoles => "Miércoles",
            Dia::Jueves => "Jueves",
            Dia::Viernes => "Viernes",
            Dia::Sabado => "Sábado",
            Dia::Domingo => "Domingo",
        }
    }

    /// Día actual según la hora local
    pub fn hoy() -> Self {
        chrono::Local::now().weekday().into()
    }
}

impl From<Weekday> for Dia {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Dia::Lunes,
            Weekday::Tue => Dia::Martes,
            Weekday::Wed => Dia::Miercoles,
            Weekday::Thu => Dia::Jueves,
            Weekday::Fri => Dia::Viernes,
            Weekday::Sat => Dia::Sabado,
            Weekday::Sun => Dia::Domingo,
        }
    }
}

impl fmt::Display for Dia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.etiqueta())
    }
}

fn sin_acentos(texto: &str) -> String {
    texto
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            otro => otro,
        })
        .collect()
}

impl FromStr for Dia {
    type Err = AppError;

    /// Acepta mayúsculas o minúsculas, con o sin acentos
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let buscado = sin_acentos(s);
        Dia::TODOS
            .into_iter()
            .find(|dia| sin_acentos(dia.etiqueta()) == buscado)
            .ok_or_else(|| AppError::validation_field("dia", &format!("Día inválido: {}", s)))
    }
}

/// Registros que tienen una hora programada
pub trait ConHora {
    fn hora_programada(&self) -> &str;
}

impl ConHora for Horario {
    fn hora_programada(&self) -> &str {
        &self.hora_programada
    }
}

impl ConHora for FuncionDia {
    fn hora_programada(&self) -> &str {
        &self.hora_programada
    }
}

/// Deja una sola entrada por `horaProgramada`, en el orden en que aparecen
pub fn dedup_por_hora<T: ConHora>(funciones: &[T]) -> Vec<&T> {
    let mut vistas: HashSet<&str> = HashSet::new();
    let mut unicas = Vec::new();
    for funcion in funciones {
        if vistas.insert(funcion.hora_programada()) {
            unicas.push(funcion);
        }
    }
    unicas
}

/// Película de la cartelera del día con sus horarios únicos
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeliculaEnCartelera {
    pub id_pelicula: Option<Id>,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub imagen: Option<String>,
    pub horarios: Vec<String>,
}

/// Agrupa las funciones del día por película conservando el orden de aparición
pub fn agrupar_por_pelicula(funciones: &[FuncionDia]) -> Vec<PeliculaEnCartelera> {
    let mut grupos: Vec<(PeliculaEnCartelera, Vec<&FuncionDia>)> = Vec::new();

    for funcion in funciones {
        let posicion = grupos.iter().position(|(pelicula, _)| {
            match (pelicula.id_pelicula, funcion.id_pelicula) {
                (Some(a), Some(b)) => a == b,
                _ => pelicula.nombre == funcion.nombre_pelicula,
            }
        });

        match posicion {
            Some(i) => grupos[i].1.push(funcion),
            None => grupos.push((
                PeliculaEnCartelera {
                    id_pelicula: funcion.id_pelicula,
                    nombre: funcion.nombre_pelicula.clone(),
                    descripcion: funcion.descripcion_pelicula.clone(),
                    imagen: funcion.imagen_pelicula.clone(),
                    horarios: Vec::new(),
                },
                vec![funcion],
            )),
        }
    }

    grupos
        .into_iter()
        .map(|(mut pelicula, funciones)| {
            let mut vistas = HashSet::new();
            pelicula.horarios = funciones
                .into_iter()
                .map(|f| f.hora_programada.as_str())
                .filter(|hora| vistas.insert(*hora))
                .map(str::to_string)
                .collect();
            pelicula
        })
        .collect()
}
