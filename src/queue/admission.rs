//! # Política de Admisión
//! src/queue/admission.rs
//!
//! Qué hace `enqueue` cuando la cola está llena. Es un único valor global
//! elegido al arrancar el servidor, no una decisión por request.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Política aplicada cuando no quedan slots libres en la cola
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionPolicy {
    /// Backpressure: el productor se bloquea hasta que un worker libere un slot.
    /// Ninguna conexión se rechaza por saturación transitoria.
    #[default]
    Block,

    /// Rechazo inmediato: el productor recibe la conexión de vuelta y la cierra
    /// sin enviar respuesta.
    Reject,
}

impl AdmissionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionPolicy::Block => "block",
            AdmissionPolicy::Reject => "reject",
        }
    }

    /// Indica si esta política puede bloquear al productor
    pub fn is_blocking(&self) -> bool {
        matches!(self, AdmissionPolicy::Block)
    }
}

impl fmt::Display for AdmissionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error de `enqueue` bajo la política `Reject`.
///
/// Devuelve el elemento rechazado al llamador (igual que
/// `std::sync::mpsc::TrySendError`), que es quien debe cerrarlo.
#[derive(Error)]
pub enum EnqueueError<T> {
    /// La cola estaba llena
    #[error("queue is full")]
    Full(T),
}

impl<T> EnqueueError<T> {
    /// Recupera el elemento que no se pudo encolar
    pub fn into_inner(self) -> T {
        match self {
            EnqueueError::Full(item) => item,
        }
    }
}

// Debug manual: no exige `T: Debug`
impl<T> fmt::Debug for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnqueueError::Full(_) => f.write_str("Full(..)"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn test_default_is_block() {
        assert_eq!(AdmissionPolicy::default(), AdmissionPolicy::Block);
        assert!(AdmissionPolicy::Block.is_blocking());
        assert!(!AdmissionPolicy::Reject.is_blocking());
    }

    #[test]
    fn test_parse_from_cli_value() {
        assert_eq!(AdmissionPolicy::from_str("block", true), Ok(AdmissionPolicy::Block));
        assert_eq!(AdmissionPolicy::from_str("REJECT", true), Ok(AdmissionPolicy::Reject));
        assert!(AdmissionPolicy::from_str("drop", true).is_err());
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&AdmissionPolicy::Reject).unwrap();
        assert_eq!(json, "\"reject\"");
    }

    #[test]
    fn test_enqueue_error_returns_item() {
        let err = EnqueueError::Full(vec![1, 2, 3]);
        assert_eq!(err.to_string(), "queue is full");
        assert_eq!(format!("{:?}", err), "Full(..)");
        assert_eq!(err.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn test_enqueue_error_without_debug_item() {
        struct Opaque;

        let err: Box<dyn std::error::Error> = Box::new(EnqueueError::Full(Opaque));
        assert_eq!(err.to_string(), "queue is full");
        assert!(err.source().is_none());
    }
}
