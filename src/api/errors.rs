//! # Manejo de errores del cliente
//!
//! Jerarquía de errores construida con thiserror. Cada variante conserva la
//! operación que falló; [`AppError::mensaje_usuario`] da el texto corto que se
//! muestra al usuario.

use thiserror::Error;

/// Mensaje genérico cuando el servidor no explica el error
pub const MENSAJE_GENERICO: &str = "Ocurrió un error al comunicarse con el servidor";

/// Tipos de error del cliente con contexto de la operación
#[derive(Error, Debug)]
pub enum AppError {
    /// Falla de transporte (DNS, conexión, timeout) durante una operación
    #[error("Error de red en operación '{operation}': {source}")]
    Network {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// Respuesta no exitosa del API que no encaja en otra categoría
    #[error("El servidor respondió {status} en operación '{operation}': {message}")]
    Api {
        operation: String,
        status: u16,
        message: String,
    },

    /// Cuerpo de respuesta que no se pudo interpretar
    #[error("Respuesta inválida en operación '{operation}': {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    /// Error de validación con campo específico
    #[error("Error de validación en campo '{field}': {message}")]
    ValidationWithField { field: String, message: String },

    /// Error de validación general
    #[error("Error de validación: {0}")]
    Validation(String),

    /// El servidor rechazó las credenciales o el token
    #[error("No autorizado para operación '{operation}': {reason}")]
    UnauthorizedWithContext { operation: String, reason: String },

    /// Operación que requiere sesión invocada sin token guardado
    #[error("No hay sesión activa para operación '{operation}'")]
    Unauthenticated { operation: String },

    /// Error de recurso no encontrado
    #[error("No encontrado: {resource_type} con ID '{id}'")]
    NotFoundWithId { resource_type: String, id: String },

    /// Error de no encontrado simple
    #[error("No encontrado: {0}")]
    NotFound(String),

    /// Conflicto, por ejemplo asientos que ya no están libres
    #[error("Conflicto: {0}")]
    Conflict(String),

    /// Falla leyendo o escribiendo el almacenamiento local de la sesión
    #[error("Error de almacenamiento en operación '{operation}': {source}")]
    Store {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuración inválida
    #[error("Configuración inválida: {0}")]
    Config(String),

    /// Error interno simple
    #[error("Error interno: {0}")]
    Internal(String),
}

impl AppError {
    /// Crea un error de red con contexto de operación
    pub fn network(operation: &str, source: reqwest::Error) -> Self {
        Self::Network {
            operation: operation.to_string(),
            source,
        }
    }

    /// Crea un error de decodificación con contexto de operación
    pub fn decode(operation: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            operation: operation.to_string(),
            source,
        }
    }

    /// Crea un error de validación con campo específico
    pub fn validation_field(field: &str, message: &str) -> Self {
        Self::ValidationWithField {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Crea un error de autorización con contexto
    pub fn unauthorized_operation(operation: &str, reason: &str) -> Self {
        Self::UnauthorizedWithContext {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unauthenticated(operation: &str) -> Self {
        Self::Unauthenticated {
            operation: operation.to_string(),
        }
    }

    /// Crea un error de no encontrado con ID
    pub fn not_found_id(resource_type: &str, id: &str) -> Self {
        Self::NotFoundWithId {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Crea un error de almacenamiento con contexto de operación
    pub fn store(operation: &str, source: std::io::Error) -> Self {
        Self::Store {
            operation: operation.to_string(),
            source,
        }
    }

    /// Traduce un status HTTP de error a la variante correspondiente
    pub fn from_status(operation: &str, status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::unauthorized_operation(operation, &message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Api {
                operation: operation.to_string(),
                status,
                message,
            },
        }
    }

    /// Indica si el error proviene de validación local (sin tráfico de red)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationWithField { .. } | Self::Validation(_))
    }

    /// Mensaje corto para mostrar al usuario final
    pub fn mensaje_usuario(&self) -> String {
        match self {
            Self::Network { .. } => {
                "No se pudo conectar con el servidor. Inténtalo de nuevo.".to_string()
            }
            Self::Api { message, .. } => message.clone(),
            Self::Decode { .. } => "El servidor envió una respuesta inesperada.".to_string(),
            Self::ValidationWithField { message, .. } => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::UnauthorizedWithContext { reason, .. } => reason.clone(),
            Self::Unauthenticated { .. } => {
                "Debes iniciar sesión para realizar esta acción.".to_string()
            }
            Self::NotFoundWithId { resource_type, id } => {
                format!("{} con ID '{}' no encontrado", resource_type, id)
            }
            Self::NotFound(message) => message.clone(),
            Self::Conflict(message) => message.clone(),
            Self::Store { .. } => "No se pudo acceder a la sesión guardada.".to_string(),
            Self::Config(message) => message.clone(),
            Self::Internal(_) => MENSAJE_GENERICO.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Convierte fallas locales inesperadas en `AppError::Internal`
pub trait ResultExt<T> {
    fn map_err_internal(self, message: &str) -> AppResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + 'static,
{
    fn map_err_internal(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Internal(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_and_403_are_unauthorized() {
        for status in [401, 403] {
            let err = AppError::from_status("logs", status, "Token inválido".to_string());
            assert!(matches!(err, AppError::UnauthorizedWithContext { .. }));
            assert_eq!(err.mensaje_usuario(), "Token inválido");
        }
    }

    #[test]
    fn other_statuses_keep_server_message() {
        let err = AppError::from_status("crear_sala", 500, "Sala duplicada".to_string());
        match &err {
            AppError::Api { status, message, .. } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "Sala duplicada");
            }
            other => panic!("variante inesperada: {other:?}"),
        }
        assert_eq!(err.mensaje_usuario(), "Sala duplicada");
    }

    #[test]
    fn validation_errors_are_flagged() {
        assert!(AppError::validation_field("correo", "inválido").is_validation());
        assert!(!AppError::Conflict("x".into()).is_validation());
    }

    #[test]
    fn map_err_internal_keeps_context_and_hides_detail() {
        let parsed: Result<u32, _> = "abc".parse::<u32>();
        let err = parsed.map_err_internal("Serializando sesión").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(err.to_string().contains("Serializando sesión"));
        assert_eq!(err.mensaje_usuario(), MENSAJE_GENERICO);
    }
}
