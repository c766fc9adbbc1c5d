//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Núcleo de despacho de conexiones:
//! 1. El acceptor acepta conexiones y las encola (o las rechaza si la cola
//!    está llena y la política es `reject`)
//! 2. Un pool fijo de workers saca conexiones de la cola
//! 3. Cada worker acumula el request, lo despacha, responde y cierra
//!
//! ```text
//! Listener ──accept──► Acceptor ──enqueue──► BoundedQueue ──dequeue──► Worker × N
//! ```

pub mod acceptor;
pub mod tcp;
pub mod worker;

#[cfg(test)]
mod mock;

pub use acceptor::{AcceptOutcome, Acceptor};
pub use tcp::Server;
pub use worker::{serve_connection, Dispatch, WorkerPool};
