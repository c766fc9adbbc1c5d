//! # Módulo HTTP
//!
//! Lo mínimo de HTTP/1.x que necesita el servidor de archivos:
//!
//! - Parsing de la request line y headers de un frame completo
//! - Construcción de responses
//! - Códigos de estado
//!
//! Sin keep-alive, sin chunked transfer encoding: una respuesta por conexión
//! y siempre `Connection: close`.

pub mod request;
pub mod response;
pub mod status;

pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
