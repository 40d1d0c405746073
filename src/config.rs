//! # Configuración del cliente
//!
//! Se lee de variables de entorno (y del archivo `.env` si existe):
//!
//! ```env
//! CINEFOX_API_URL=https://apiboletos.onrender.com
//! CINEFOX_STORE_PATH=/home/usuario/.cinefox/session.json
//! CINEFOX_TIMEOUT_SECS=30
//! CINEFOX_PRICING=fija
//! CINEFOX_TARIFA=80
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::{AppError, AppResult};
use crate::domain::precio::{PoliticaPrecio, TARIFA_FIJA_DEFAULT};

pub const DEFAULT_API_URL: &str = "https://apiboletos.onrender.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub store_path: PathBuf,
    pub timeout: Duration,
    pub politica_precio: PoliticaPrecio,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            store_path: default_store_path(None),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            politica_precio: PoliticaPrecio::default(),
        }
    }
}

/// Verifica el esquema de la URL base y quita las diagonales finales
pub fn validar_api_url(url: &str) -> AppResult<String> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::Config(format!(
            "La URL del API debe comenzar con http:// o https:// (recibido: {})",
            url
        )));
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn default_store_path(home: Option<String>) -> PathBuf {
    home.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cinefox")
        .join("session.json")
}

impl ClientConfig {
    /// Carga la configuración desde el entorno del proceso
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Carga la configuración usando una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("CINEFOX_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = validar_api_url(&api_url)?;

        let store_path = lookup("CINEFOX_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_store_path(lookup("HOME")));

        let timeout_secs = match lookup("CINEFOX_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("CINEFOX_TIMEOUT_SECS inválido: {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        // reqwest toma 0 como límite vencido: toda solicitud fallaría
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "CINEFOX_TIMEOUT_SECS debe ser mayor que 0".to_string(),
            ));
        }

        let tarifa = match lookup("CINEFOX_TARIFA") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::Config(format!("CINEFOX_TARIFA inválida: {}", raw)))?,
            None => TARIFA_FIJA_DEFAULT,
        };

        let politica_precio = PoliticaPrecio::desde_nombre(
            lookup("CINEFOX_PRICING").as_deref().unwrap_or("fija"),
            tarifa,
        )?;

        Ok(Self {
            api_url,
            store_path,
            timeout: Duration::from_secs(timeout_secs),
            politica_precio,
        })
    }
}
