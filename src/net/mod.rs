//! # Red
//! src/net/mod.rs
//!
//! Listener y stream que consume el núcleo, más el handle con dueño único
//! que viaja del acceptor a la cola y de la cola al worker.

pub mod connection;
pub mod tcp;

pub use connection::{Connection, ConnectionHandle, Listener};
pub use tcp::TcpAcceptor;
