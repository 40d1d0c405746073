//! # Cliente del API de boletos
//!
//! Un método asíncrono por operación REST. Cada solicitud:
//!
//! 1. adjunta el token bearer guardado cuando la operación lo requiere,
//! 2. verifica el status de la respuesta,
//! 3. convierte las fallas en [`AppError`] con el mensaje del servidor si existe.
//!
//! No hay reintentos ni deduplicación de solicitudes.
//!
//! ## Módulos
//!
//! - [`usuarios`] - Login, registro y logout
//! - [`peliculas`] - CRUD de películas (multipart)
//! - [`horarios`] - CRUD de horarios
//! - [`salas`] - Salas
//! - [`cartelera`] - Cartelera general y por día
//! - [`asientos`] - Inventario de asientos y actualización masiva
//! - [`contacto`] - Mensajes de contacto
//! - [`logs`] - Bitácora del servidor

pub mod asientos;
pub mod cartelera;
pub mod contacto;
pub mod errors;
pub mod horarios;
pub mod logging;
pub mod logs;
pub mod peliculas;
pub mod salas;
pub mod usuarios;

pub use errors::{AppError, AppResult, ResultExt, MENSAJE_GENERICO};
pub use logging::ErrorLogExt;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::models::Confirmacion;
use crate::store::{TokenStore, TOKEN_KEY};

/// Qué hacer con el token guardado en cada operación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// No se envía token
    Ninguna,
    /// Se envía si existe
    Opcional,
    /// Sin token la operación falla antes de tocar la red
    Requerida,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

/// Extrae el mensaje de error de un cuerpo de respuesta
///
/// Busca `message`, `error` o `mensaje` en un objeto JSON; si el cuerpo no es
/// JSON y es texto corto, lo usa tal cual.
pub fn extraer_mensaje(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => ["message", "error", "mensaje"]
            .iter()
            .filter_map(|key| map.get(*key))
            .filter_map(|value| value.as_str())
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string),
        Ok(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Ok(_) => None,
        Err(_) if body.len() <= 200 && !body.starts_with('<') => Some(body.to_string()),
        Err(_) => None,
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cinefox/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err_internal("Error creando cliente HTTP")?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn authorize(
        &self,
        builder: RequestBuilder,
        auth: Auth,
        operation: &str,
    ) -> AppResult<RequestBuilder> {
        match auth {
            Auth::Ninguna => Ok(builder),
            Auth::Opcional => Ok(match self.store.get(TOKEN_KEY).await? {
                Some(token) => builder.bearer_auth(token),
                None => builder,
            }),
            Auth::Requerida => {
                let token = self
                    .store
                    .get(TOKEN_KEY)
                    .await?
                    .ok_or_else(|| AppError::unauthenticated(operation))?;
                Ok(builder.bearer_auth(token))
            }
        }
    }

    /// Envía la solicitud y devuelve el cuerpo de una respuesta exitosa
    pub(crate) async fn send(
        &self,
        operation: &str,
        builder: RequestBuilder,
        auth: Auth,
    ) -> AppResult<String> {
        let request = self
            .authorize(builder, auth, operation)
            .await?
            .build()
            .map_err(|e| AppError::network(operation, e))?;

        tracing::debug!(
            operation = %operation,
            method = %request.method(),
            url = %request.url(),
            "Enviando solicitud"
        );

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| AppError::network(operation, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::network(operation, e))?;

        if !status.is_success() {
            let message = extraer_mensaje(&body).unwrap_or_else(|| MENSAJE_GENERICO.to_string());
            tracing::debug!(
                operation = %operation,
                status = status.as_u16(),
                message = %message,
                "Respuesta de error"
            );
            return Err(AppError::from_status(operation, status.as_u16(), message));
        }

        Ok(body)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        builder: RequestBuilder,
        auth: Auth,
    ) -> AppResult<T> {
        let body = self.send(operation, builder, auth).await?;
        serde_json::from_str(&body).map_err(|e| AppError::decode(operation, e))
    }

    /// Para escrituras: el cuerpo de respuesta es informativo y puede venir vacío
    pub(crate) async fn send_confirmacion(
        &self,
        operation: &str,
        builder: RequestBuilder,
        auth: Auth,
    ) -> AppResult<Confirmacion> {
        let body = self.send(operation, builder, auth).await?;
        let confirmacion = serde_json::from_str::<Confirmacion>(&body).unwrap_or_default();
        tracing::info!(
            operation = %operation,
            mensaje = confirmacion.mensaje.as_deref().unwrap_or(""),
            "Operación completada"
        );
        Ok(confirmacion)
    }
}
