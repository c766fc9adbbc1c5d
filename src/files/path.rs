//! # Resolución de Paths
//! src/files/path.rs
//!
//! Traduce el path de un request a un archivo bajo el directorio raíz,
//! rechazando lo que pueda salir de él.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Archivo que se sirve para `/` (o para un path que termina en `/`)
pub const INDEX_FILE: &str = "index.html";

/// Motivo por el que un path no se puede servir
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Más `/` de los permitidos
    #[error("too many path segments ({found} > {max})")]
    TooManySegments { found: usize, max: usize },

    /// `..`, `\` o NUL en el path
    #[error("path escapes the document root")]
    Traversal,
}

/// Cuenta las `/` del path (una por segmento)
pub fn segment_count(path: &str) -> usize {
    path.bytes().filter(|&b| b == b'/').count()
}

/// Resuelve `request_path` bajo `root`.
///
/// # Ejemplo
///
/// ```
/// use file_server::files::path::resolve;
/// use std::path::Path;
///
/// let file = resolve(Path::new("/srv"), "/", 1).unwrap();
/// assert_eq!(file, Path::new("/srv/index.html"));
///
/// assert!(resolve(Path::new("/srv"), "/a/b.txt", 1).is_err());
/// assert!(resolve(Path::new("/srv"), "/a/b.txt", 3).is_ok());
/// ```
pub fn resolve(root: &Path, request_path: &str, max_segments: usize) -> Result<PathBuf, PathError> {
    let found = segment_count(request_path);
    if found > max_segments {
        return Err(PathError::TooManySegments {
            found,
            max: max_segments,
        });
    }

    if request_path.contains('\\') || request_path.contains('\0') {
        return Err(PathError::Traversal);
    }

    let mut relative = PathBuf::new();
    for segment in request_path.split('/').filter(|s| !s.is_empty()) {
        if segment == ".." {
            return Err(PathError::Traversal);
        }
        relative.push(segment);
    }

    if relative.as_os_str().is_empty() || request_path.ends_with('/') {
        relative.push(INDEX_FILE);
    }

    // Solo componentes normales: nada absoluto, nada de prefijos
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(PathError::Traversal);
    }

    Ok(root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> &'static Path {
        Path::new("/srv/www")
    }

    #[test]
    fn test_root_maps_to_index() {
        assert_eq!(resolve(root(), "/", 1).unwrap(), root().join("index.html"));
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(resolve(root(), "/a.txt", 1).unwrap(), root().join("a.txt"));
    }

    #[test]
    fn test_segment_limit_one() {
        let err = resolve(root(), "/dir/a.txt", 1).unwrap_err();
        assert_eq!(err, PathError::TooManySegments { found: 2, max: 1 });
    }

    #[test]
    fn test_segment_limit_three() {
        assert_eq!(
            resolve(root(), "/a/b/c.txt", 3).unwrap(),
            root().join("a").join("b").join("c.txt")
        );
        assert!(resolve(root(), "/a/b/c/d.txt", 3).is_err());
    }

    #[test]
    fn test_trailing_slash_serves_index() {
        assert_eq!(
            resolve(root(), "/docs/", 2).unwrap(),
            root().join("docs").join("index.html")
        );
    }

    #[test]
    fn test_dot_dot_is_rejected() {
        assert_eq!(resolve(root(), "/..", 1).unwrap_err(), PathError::Traversal);
        assert_eq!(resolve(root(), "/a/../../etc/passwd", 5).unwrap_err(), PathError::Traversal);
    }

    #[test]
    fn test_backslash_and_nul_are_rejected() {
        assert_eq!(resolve(root(), "/..\\secret", 1).unwrap_err(), PathError::Traversal);
        assert_eq!(resolve(root(), "/a\0b", 1).unwrap_err(), PathError::Traversal);
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(segment_count("/"), 1);
        assert_eq!(segment_count("/a/b"), 2);
        assert_eq!(segment_count("/a//b/"), 4);
    }
}
