//! Almacenamiento de sesión en un archivo JSON versionado.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::TokenStore;
use crate::api::{AppError, AppResult, ResultExt};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Default)]
struct SessionFile {
    version: u32,
    entries: HashMap<String, String>,
}

/// Guarda las entradas en disco; cada escritura reescribe el archivo completo
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // serializa lectura-modificación-escritura dentro del proceso
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> AppResult<HashMap<String, String>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(AppError::store("leer_sesion", e)),
        };

        let file: SessionFile = match serde_json::from_slice(&data) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Archivo de sesión ilegible, se descarta"
                );
                return Ok(HashMap::new());
            }
        };

        if file.version != FORMAT_VERSION {
            tracing::warn!(
                version = file.version,
                path = %self.path.display(),
                "Versión de archivo de sesión desconocida, se ignora"
            );
            return Ok(HashMap::new());
        }

        Ok(file.entries)
    }

    async fn save(&self, entries: HashMap<String, String>) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| AppError::store("crear_directorio_sesion", e))?;
            }
        }

        let file = SessionFile {
            version: FORMAT_VERSION,
            entries,
        };
        let data = serde_json::to_vec_pretty(&file).map_err_internal("Serializando sesión")?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // solo el dueño puede leer el token, desde la creación
        #[cfg(unix)]
        options.mode(0o600);

        let mut handle = options
            .open(&self.path)
            .await
            .map_err(|e| AppError::store("guardar_sesion", e))?;

        // un archivo previo conserva sus permisos al abrirse
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            handle
                .set_permissions(std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| AppError::store("permisos_sesion", e))?;
        }

        handle
            .write_all(&data)
            .await
            .map_err(|e| AppError::store("guardar_sesion", e))?;
        handle
            .flush()
            .await
            .map_err(|e| AppError::store("guardar_sesion", e))?;

        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(entries).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(entries).await?;
        }
        Ok(())
    }
}
