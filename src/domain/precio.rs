//! Precio de los boletos.
//!
//! La tarifa fija de 80 y el `precioBoleto` de cada película pueden no
//! coincidir. La política es configurable y la divergencia se reporta en el log.

use std::fmt;
use std::str::FromStr;

use crate::api::AppError;
use crate::models::Pelicula;

pub const TARIFA_FIJA_DEFAULT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoliticaPrecio {
    /// Mismo precio para todas las películas
    TarifaFija(f64),
    /// `precioBoleto` de la película, o la tarifa fija si no lo trae
    PorPelicula { respaldo: f64 },
}

impl Default for PoliticaPrecio {
    fn default() -> Self {
        Self::TarifaFija(TARIFA_FIJA_DEFAULT)
    }
}

impl PoliticaPrecio {
    /// Construye la política a partir del nombre (`fija` / `pelicula`) y la tarifa
    pub fn desde_nombre(nombre: &str, tarifa: f64) -> Result<Self, AppError> {
        if !tarifa.is_finite() || tarifa <= 0.0 {
            return Err(AppError::Config(format!("Tarifa inválida: {}", tarifa)));
        }
        match nombre.trim().to_lowercase().as_str() {
            "fija" => Ok(Self::TarifaFija(tarifa)),
            "pelicula" | "película" => Ok(Self::PorPelicula { respaldo: tarifa }),
            otro => Err(AppError::Config(format!(
                "Política de precio desconocida: '{}' (use 'fija' o 'pelicula')",
                otro
            ))),
        }
    }

    /// Precio unitario para una película
    pub fn precio_unitario(&self, pelicula: &Pelicula) -> f64 {
        match *self {
            Self::TarifaFija(tarifa) => {
                if let Some(precio) = pelicula.precio_boleto {
                    if (precio - tarifa).abs() > f64::EPSILON {
                        tracing::warn!(
                            pelicula = %pelicula.nombre_pelicula,
                            precio_boleto = precio,
                            tarifa_fija = tarifa,
                            "El precio de la película difiere de la tarifa fija"
                        );
                    }
                }
                tarifa
            }
            Self::PorPelicula { respaldo } => match pelicula.precio_boleto {
                Some(precio) if precio > 0.0 => precio,
                _ => respaldo,
            },
        }
    }

    /// Total redondeado a centavos
    pub fn total(&self, pelicula: &Pelicula, boletos: usize) -> f64 {
        let total = self.precio_unitario(pelicula) * boletos as f64;
        (total * 100.0).round() / 100.0
    }
}

impl fmt::Display for PoliticaPrecio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TarifaFija(tarifa) => write!(f, "tarifa fija de ${:.2}", tarifa),
            Self::PorPelicula { respaldo } => {
                write!(f, "precio por película (respaldo ${:.2})", respaldo)
            }
        }
    }
}

impl FromStr for PoliticaPrecio {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::desde_nombre(s, TARIFA_FIJA_DEFAULT)
    }
}
