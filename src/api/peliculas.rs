use reqwest::Method;

use super::{ApiClient, AppError, AppResult, Auth};
use crate::models::{Confirmacion, Id, Pelicula, PeliculaForm};

impl ApiClient {
    pub async fn peliculas(&self) -> AppResult<Vec<Pelicula>> {
        let builder = self.request(Method::GET, "/peliculas");
        self.send_json("peliculas", builder, Auth::Opcional).await
    }

    pub async fn pelicula(&self, id: Id) -> AppResult<Pelicula> {
        let builder = self.request(Method::GET, &format!("/peliculas/{}", id));
        self.send_json("pelicula", builder, Auth::Opcional)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::not_found_id("Película", &id.to_string()),
                other => other,
            })
    }

    /// Alta de película; la imagen viaja como parte del formulario multipart
    pub async fn crear_pelicula(&self, form: PeliculaForm) -> AppResult<Confirmacion> {
        let builder = self
            .request(Method::POST, "/peliculas")
            .multipart(form.into_multipart()?);
        self.send_confirmacion("crear_pelicula", builder, Auth::Requerida)
            .await
    }

    pub async fn actualizar_pelicula(&self, id: Id, form: PeliculaForm) -> AppResult<Confirmacion> {
        let builder = self
            .request(Method::PUT, &format!("/peliculas/{}", id))
            .multipart(form.into_multipart()?);
        self.send_confirmacion("actualizar_pelicula", builder, Auth::Requerida)
            .await
    }

    pub async fn eliminar_pelicula(&self, id: Id) -> AppResult<Confirmacion> {
        let builder = self.request(Method::DELETE, &format!("/peliculas/{}", id));
        self.send_confirmacion("eliminar_pelicula", builder, Auth::Requerida)
            .await
    }
}
