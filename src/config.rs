//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de archivos con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./file_server --port 8080 \
//!   --root ./public \
//!   --workers 8 \
//!   --queue-capacity 10 \
//!   --admission reject
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 ROOT_DIR=./public ADMISSION_POLICY=block ./file_server
//! ```

use crate::error::ServerError;
use crate::frame::{DEFAULT_MAX_FRAME_BYTES, TERMINATOR};
use crate::queue::AdmissionPolicy;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "file_server")]
#[command(about = "Servidor de archivos estáticos con pool de workers y cola acotada")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = efímero)
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio que se sirve
    #[arg(long = "root", default_value = ".", env = "ROOT_DIR")]
    pub root_dir: PathBuf,

    // === Workers y cola ===
    /// Número de workers (fijo durante toda la ejecución)
    #[arg(long, default_value = "8", env = "WORKERS")]
    pub workers: usize,

    /// Capacidad de la cola de conexiones pendientes
    #[arg(long = "queue-capacity", default_value = "10", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Qué hacer cuando la cola está llena: esperar (block) o cerrar la conexión (reject)
    #[arg(long, value_enum, default_value_t = AdmissionPolicy::Block, env = "ADMISSION_POLICY")]
    pub admission: AdmissionPolicy,

    // === Requests ===
    /// Tamaño máximo de la cabecera de un request (bytes)
    #[arg(long = "max-request-bytes", default_value_t = DEFAULT_MAX_FRAME_BYTES, env = "MAX_REQUEST_BYTES")]
    pub max_request_bytes: usize,

    /// Máximo de '/' permitidos en el path antes de responder 403
    #[arg(long = "max-path-segments", default_value = "1", env = "MAX_PATH_SEGMENTS")]
    pub max_path_segments: usize,

    /// Timeout de lectura por conexión en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "0", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    // === Observabilidad ===
    /// Cada cuántos segundos se registran las métricas (0 = nunca)
    #[arg(long = "stats-interval-secs", default_value = "0", env = "STATS_INTERVAL_SECS")]
    pub stats_interval_secs: u64,

    /// Nivel de log (trace, debug, info, warn, error)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use file_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    pub fn stats_interval(&self) -> Option<Duration> {
        (self.stats_interval_secs > 0).then(|| Duration::from_secs(self.stats_interval_secs))
    }

    /// Nivel de log configurado (INFO si no se reconoce)
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(&self.log_level).unwrap_or(tracing::Level::INFO)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.workers == 0 {
            return Err(ServerError::InvalidConfig("workers must be >= 1".to_string()));
        }

        if self.queue_capacity == 0 {
            return Err(ServerError::InvalidConfig(
                "queue capacity must be >= 1".to_string(),
            ));
        }

        if self.max_request_bytes < TERMINATOR.len() {
            return Err(ServerError::InvalidConfig(format!(
                "max request bytes must be >= {}",
                TERMINATOR.len()
            )));
        }

        if self.max_path_segments == 0 {
            return Err(ServerError::InvalidConfig(
                "max path segments must be >= 1".to_string(),
            ));
        }

        if tracing::Level::from_str(&self.log_level).is_err() {
            return Err(ServerError::InvalidConfig(format!(
                "unknown log level: {}",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║              Static File Server Configuration               ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:        {}", self.address());
        println!("   Root dir:       {}", self.root_dir.display());
        match self.read_timeout() {
            Some(timeout) => println!("   Read timeout:   {} ms", timeout.as_millis()),
            None => println!("   Read timeout:   disabled"),
        }
        println!();
        println!("👷 Workers & Queue:");
        println!("   Workers:        {}", self.workers);
        println!("   Queue capacity: {}", self.queue_capacity);
        println!("   Admission:      {}", self.admission);
        println!();
        println!("📨 Requests:");
        println!("   Max header:     {} bytes", self.max_request_bytes);
        println!("   Max segments:   {}", self.max_path_segments);
        println!();
        println!("═══════════════════════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto (igual a la del CLI sin argumentos)
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            root_dir: PathBuf::from("."),
            workers: 8,
            queue_capacity: 10,
            admission: AdmissionPolicy::Block,
            max_request_bytes: DEFAULT_MAX_FRAME_BYTES,
            max_path_segments: 1,
            read_timeout_ms: 0,
            stats_interval_secs: 0,
            log_level: "info".to_string(),
        }
    }
}
