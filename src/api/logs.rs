use reqwest::Method;

use super::{ApiClient, AppResult, Auth};
use crate::models::RegistroLog;

impl ApiClient {
    /// Bitácora de acciones registrada por el servidor (solo administradores)
    pub async fn logs(&self) -> AppResult<Vec<RegistroLog>> {
        let builder = self.request(Method::GET, "/logs");
        self.send_json("logs", builder, Auth::Requerida).await
    }
}
