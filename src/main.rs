//! # File Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de archivos.

use file_server::config::Config;
use file_server::server::Server;

fn main() {
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 {}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .with_thread_names(true)
        .init();

    config.print_summary();

    let mut server = Server::new(config);

    // Solo retorna si falla el arranque
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
