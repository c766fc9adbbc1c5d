//! # Códigos de Estado HTTP
//!
//! Códigos que puede producir el servidor de archivos:
//!
//! - **2xx**: 200 OK
//! - **3xx**: 304 cuando el `ETag` coincide con `If-None-Match`
//! - **4xx**: request inválido, path prohibido, archivo inexistente, request demasiado grande
//! - **5xx**: error leyendo el archivo, método no implementado

/// Códigos de estado que soporta el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - Archivo encontrado
    Ok = 200,

    /// 304 Not Modified - El cliente ya tiene la versión actual
    NotModified = 304,

    /// 400 Bad Request - Request malformado
    BadRequest = 400,

    /// 403 Forbidden - Path con demasiados segmentos o con `..`
    Forbidden = 403,

    /// 404 Not Found - Archivo inexistente o que no es regular
    NotFound = 404,

    /// 413 Payload Too Large - Los headers no cupieron en el frame
    PayloadTooLarge = 413,

    /// 500 Internal Server Error - Falló la lectura del archivo
    InternalServerError = 500,

    /// 501 Not Implemented - Método distinto de GET/HEAD
    NotImplemented = 501,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use file_server::http::StatusCode;
    /// assert_eq!(StatusCode::PayloadTooLarge.as_u16(), 413);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Texto de razón (reason phrase) asociado al código
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
