//! # Servidor de Archivos Estáticos
//! src/files/mod.rs
//!
//! Colaborador de despacho: recibe un request completo y produce la
//! respuesta leyendo un archivo bajo el directorio raíz.
//!
//! ```text
//! frame → parse → método → path (segmentos, traversal) → archivo → Response
//! ```

pub mod mime;
pub mod path;

use crate::http::{Method, ParseError, Request, Response, StatusCode};
use crate::server::Dispatch;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Sirve archivos de `root` con GET y HEAD
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    max_path_segments: usize,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, max_path_segments: usize) -> Self {
        Self {
            root: root.into(),
            max_path_segments,
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Atiende un request ya parseado
    pub fn serve(&self, request: &Request) -> Response {
        let file = match path::resolve(&self.root, request.path(), self.max_path_segments) {
            Ok(file) => file,
            Err(e) => return Response::error(StatusCode::Forbidden, &e.to_string()),
        };

        let is_file = fs::metadata(&file).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            return Response::error(
                StatusCode::NotFound,
                &format!("No such file: {}", request.path()),
            );
        }

        let contents = match fs::read(&file) {
            Ok(contents) => contents,
            Err(e) => return Self::read_error(request.path(), e),
        };

        let etag = format!("\"{:x}\"", Sha256::digest(&contents));

        if request.header("If-None-Match") == Some(etag.as_str()) {
            return Response::new(StatusCode::NotModified).with_header("ETag", &etag);
        }

        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", mime::content_type(&file))
            .with_header("ETag", &etag)
            .with_body(contents);

        match request.method() {
            Method::GET => response,
            Method::HEAD => response.without_body(),
        }
    }

    fn read_error(path: &str, error: std::io::Error) -> Response {
        match error.kind() {
            ErrorKind::NotFound => {
                Response::error(StatusCode::NotFound, &format!("No such file: {}", path))
            }
            ErrorKind::PermissionDenied => {
                Response::error(StatusCode::Forbidden, &format!("Permission denied: {}", path))
            }
            _ => {
                tracing::warn!(path, error = %error, "failed to read file");
                Response::error(StatusCode::InternalServerError, "Failed to read file")
            }
        }
    }
}

impl Dispatch for StaticFiles {
    fn dispatch(&self, frame: &[u8]) -> Response {
        match Request::parse(frame) {
            Ok(request) => self.serve(&request),
            Err(ParseError::UnsupportedMethod(method)) => Response::error(
                StatusCode::NotImplemented,
                &format!("Method not implemented: {}", method),
            ),
            Err(e) => Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e)),
        }
    }
}
