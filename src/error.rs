//! # Errores del Servidor
//! src/error.rs
//!
//! Errores que pueden detener el arranque del servidor. Los errores de una
//! conexión individual nunca llegan aquí: el acceptor y los workers los
//! registran y siguen con la siguiente conexión.

use thiserror::Error;

/// Error de nivel servidor (arranque, bind, configuración)
#[derive(Debug, Error)]
pub enum ServerError {
    /// Error de I/O genérico
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No se pudo hacer bind a la dirección configurada
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuración inválida
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_config() {
        let err = ServerError::InvalidConfig("workers must be >= 1".to_string());
        assert_eq!(err.to_string(), "invalid configuration: workers must be >= 1");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: ServerError = io.into();
        assert!(matches!(err, ServerError::Io(_)));
        assert!(err.to_string().contains("boom"));
    }
}
