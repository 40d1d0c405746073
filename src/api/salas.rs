use reqwest::Method;

use super::{ApiClient, AppResult, Auth};
use crate::models::{Confirmacion, Id, NuevaSala, Sala};

impl ApiClient {
    pub async fn salas(&self) -> AppResult<Vec<Sala>> {
        let builder = self.request(Method::GET, "/salas");
        self.send_json("salas", builder, Auth::Opcional).await
    }

    /// El servidor genera el inventario de asientos de la sala nueva
    pub async fn crear_sala(&self, sala: &NuevaSala) -> AppResult<Confirmacion> {
        let builder = self.request(Method::POST, "/salas").json(sala);
        self.send_confirmacion("crear_sala", builder, Auth::Requerida)
            .await
    }

    pub async fn eliminar_sala(&self, id: Id) -> AppResult<Confirmacion> {
        let builder = self.request(Method::DELETE, &format!("/salas/{}", id));
        self.send_confirmacion("eliminar_sala", builder, Auth::Requerida)
            .await
    }
}
