//! # File Server
//! src/lib.rs
//!
//! Servidor de archivos estáticos sobre HTTP/1.x construido alrededor de un
//! núcleo de despacho concurrente: un acceptor, una cola acotada con
//! compuerta de admisión y un pool fijo de workers.
//!
//! ## Arquitectura
//!
//! - `queue`: Cola acotada y políticas de admisión (`block` / `reject`)
//! - `frame`: Acumulación de lecturas parciales hasta `\r\n\r\n`
//! - `net`: Traits de listener/stream y su implementación TCP
//! - `server`: Acceptor, pool de workers y armado del servidor
//! - `http`: Parsing de requests y construcción de responses
//! - `files`: Resolución de paths y lectura de archivos
//! - `metrics`: Contadores y latencias
//! - `config`: Configuración por CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use file_server::config::Config;
//! use file_server::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod files;
pub mod frame;
pub mod http;
pub mod metrics;
pub mod net;
pub mod queue;
pub mod server;
