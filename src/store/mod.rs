//! # Almacenamiento local de la sesión
//!
//! Equivalente al almacenamiento clave-valor persistente del dispositivo: guarda
//! el token bearer y los datos del usuario autenticado entre ejecuciones.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::api::AppResult;

/// Clave del token bearer
pub const TOKEN_KEY: &str = "token";
/// Clave del usuario autenticado (JSON)
pub const USUARIO_KEY: &str = "usuario";

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
    async fn remove(&self, key: &str) -> AppResult<()>;
}
