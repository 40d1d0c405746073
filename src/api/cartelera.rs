use reqwest::Method;

use super::{ApiClient, AppResult, Auth};
use crate::domain::cartelera::Dia;
use crate::models::{Cartelera, Confirmacion, FuncionDia, Id, NuevaCartelera};

impl ApiClient {
    pub async fn carteleras(&self) -> AppResult<Vec<Cartelera>> {
        let builder = self.request(Method::GET, "/cartelera");
        self.send_json("carteleras", builder, Auth::Opcional).await
    }

    /// Funciones de un día, sin deduplicar; ver [`crate::domain::cartelera::dedup_por_hora`]
    pub async fn cartelera_dia(&self, dia: Dia) -> AppResult<Vec<FuncionDia>> {
        let builder = self
            .request(Method::GET, "/cartelera/carteleraDia")
            .query(&[("dia", dia.etiqueta())]);
        self.send_json("cartelera_dia", builder, Auth::Opcional)
            .await
    }

    pub async fn crear_cartelera(&self, cartelera: &NuevaCartelera) -> AppResult<Confirmacion> {
        let builder = self.request(Method::POST, "/cartelera").json(cartelera);
        self.send_confirmacion("crear_cartelera", builder, Auth::Requerida)
            .await
    }

    pub async fn eliminar_cartelera(&self, id: Id) -> AppResult<Confirmacion> {
        let builder = self.request(Method::DELETE, &format!("/cartelera/{}", id));
        self.send_confirmacion("eliminar_cartelera", builder, Auth::Requerida)
            .await
    }
}
