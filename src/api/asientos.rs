use reqwest::Method;

use super::{ApiClient, AppError, AppResult, Auth};
use crate::models::{ActualizacionAsientos, Asiento, CambioAsiento, Confirmacion, Id};

impl ApiClient {
    /// Inventario de asientos de una sala
    pub async fn asientos(&self, id_sala: Id) -> AppResult<Vec<Asiento>> {
        let builder = self
            .request(Method::GET, "/asientos")
            .query(&[("idSala", id_sala)]);
        self.send_json("asientos", builder, Auth::Opcional).await
    }

    /// Cambia el estado de varios asientos en una sola solicitud
    ///
    /// El servidor no verifica que el asiento siga libre: dos compras
    /// simultáneas pueden marcar el mismo asiento.
    pub async fn actualizar_asientos(&self, cambios: Vec<CambioAsiento>) -> AppResult<Confirmacion> {
        if cambios.is_empty() {
            return Err(AppError::validation_field(
                "asientos",
                "No hay asientos para actualizar",
            ));
        }
        let cuerpo = ActualizacionAsientos { asientos: cambios };
        let builder = self.request(Method::PUT, "/asientos").json(&cuerpo);
        self.send_confirmacion("actualizar_asientos", builder, Auth::Requerida)
            .await
    }
}
