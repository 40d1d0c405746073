//! # Usuarios y sesión
//!
//! El token obtenido en el login se guarda en el [`TokenStore`] y se lee en
//! cada solicitud autenticada. El logout lo borra aunque el servidor falle.
//!
//! [`TokenStore`]: crate::store::TokenStore

use reqwest::Method;

use super::{ApiClient, AppError, AppResult, Auth};
use crate::models::{Confirmacion, Credenciales, NuevoUsuario, Sesion, TipoUsuario, Usuario};
use crate::store::{TOKEN_KEY, USUARIO_KEY};

impl ApiClient {
    /// Inicia sesión y guarda el token
    pub async fn login(&self, correo: &str, contrasena: &str) -> AppResult<Sesion> {
        let credenciales = Credenciales {
            correo_usuario: correo,
            contrasena_usuario: contrasena,
        };
        let builder = self
            .request(Method::POST, "/usuarios/login")
            .json(&credenciales);
        let sesion: Sesion = self.send_json("login", builder, Auth::Ninguna).await?;

        if sesion.token.trim().is_empty() {
            return Err(AppError::unauthorized_operation(
                "login",
                "El servidor no devolvió un token",
            ));
        }

        self.store().set(TOKEN_KEY, &sesion.token).await?;
        match &sesion.usuario {
            Some(usuario) => {
                let json = serde_json::to_string(usuario)
                    .map_err(|e| AppError::decode("login", e))?;
                self.store().set(USUARIO_KEY, &json).await?;
            }
            None => self.store().remove(USUARIO_KEY).await?,
        }

        tracing::info!(correo = %correo, "Sesión iniciada");
        Ok(sesion)
    }

    /// Registro público; siempre como cliente
    pub async fn registrar_usuario(&self, mut nuevo: NuevoUsuario) -> AppResult<Confirmacion> {
        nuevo.tipo_usuario = TipoUsuario::Cliente;
        let builder = self.request(Method::POST, "/usuarios").json(&nuevo);
        self.send_confirmacion("registrar_usuario", builder, Auth::Ninguna)
            .await
    }

    /// Alta de administradores; requiere sesión
    pub async fn registrar_admin(&self, mut nuevo: NuevoUsuario) -> AppResult<Confirmacion> {
        nuevo.tipo_usuario = TipoUsuario::Admin;
        let builder = self.request(Method::POST, "/usuarios").json(&nuevo);
        self.send_confirmacion("registrar_admin", builder, Auth::Requerida)
            .await
    }

    /// Cierra la sesión en el servidor y borra el token local
    pub async fn logout(&self) -> AppResult<()> {
        let builder = self.request(Method::POST, "/usuarios/logout");
        let resultado = self.send("logout", builder, Auth::Requerida).await;

        self.store().remove(TOKEN_KEY).await?;
        self.store().remove(USUARIO_KEY).await?;

        match resultado {
            Ok(_) => {
                tracing::info!("Sesión cerrada");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "El servidor rechazó el logout; token local eliminado");
                Err(e)
            }
        }
    }

    /// Hay token guardado (no se verifica con el servidor)
    pub async fn sesion_activa(&self) -> AppResult<bool> {
        Ok(self.store().get(TOKEN_KEY).await?.is_some())
    }

    /// Usuario guardado en el último login, si el servidor lo envió
    pub async fn usuario_actual(&self) -> AppResult<Option<Usuario>> {
        match self.store().get(USUARIO_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| AppError::decode("usuario_actual", e)),
            None => Ok(None),
        }
    }
}
