use reqwest::Method;

use super::{ApiClient, AppResult, Auth};
use crate::models::{Confirmacion, Horario, Id, NuevoHorario};

impl ApiClient {
    pub async fn horarios(&self) -> AppResult<Vec<Horario>> {
        let builder = self.request(Method::GET, "/horarios");
        self.send_json("horarios", builder, Auth::Opcional).await
    }

    pub async fn crear_horario(&self, horario: &NuevoHorario) -> AppResult<Confirmacion> {
        let builder = self.request(Method::POST, "/horarios").json(horario);
        self.send_confirmacion("crear_horario", builder, Auth::Requerida)
            .await
    }

    pub async fn actualizar_horario(&self, id: Id, horario: &NuevoHorario) -> AppResult<Confirmacion> {
        let builder = self
            .request(Method::PUT, &format!("/horarios/{}", id))
            .json(horario);
        self.send_confirmacion("actualizar_horario", builder, Auth::Requerida)
            .await
    }

    pub async fn eliminar_horario(&self, id: Id) -> AppResult<Confirmacion> {
        let builder = self.request(Method::DELETE, &format!("/horarios/{}", id));
        self.send_confirmacion("eliminar_horario", builder, Auth::Requerida)
            .await
    }
}
