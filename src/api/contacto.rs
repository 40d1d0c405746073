use reqwest::Method;

use super::{ApiClient, AppResult, Auth};
use crate::domain::validacion::{validar_contacto, ContactoEntrada};
use crate::models::{Confirmacion, MensajeContacto};

impl ApiClient {
    /// Valida el formulario y lo envía; si no pasa la validación no hay solicitud
    pub async fn enviar_contacto(&self, entrada: &ContactoEntrada) -> AppResult<Confirmacion> {
        let mensaje = validar_contacto(entrada)?;
        let builder = self.request(Method::POST, "/contacto/contact").json(&mensaje);
        self.send_confirmacion("enviar_contacto", builder, Auth::Opcional)
            .await
    }

    pub async fn mensajes_contacto(&self) -> AppResult<Vec<MensajeContacto>> {
        let builder = self.request(Method::GET, "/contacto/contact");
        self.send_json("mensajes_contacto", builder, Auth::Requerida)
            .await
    }
}
