//! # Conexiones
//! src/net/connection.rs
//!
//! Abstracciones mínimas sobre el socket que usa el núcleo: un listener que
//! acepta y un stream que lee, escribe y se cierra. El servidor real usa TCP;
//! los tests usan implementaciones en memoria.

use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::time::Instant;

/// Stream bidireccional de una conexión aceptada
pub trait Connection: Read + Write + Send + 'static {
    /// Cierra ambas direcciones del stream
    fn shutdown(&self) -> io::Result<()>;
}

/// Fuente de conexiones entrantes
pub trait Listener: Send {
    type Stream: Connection;

    /// Acepta una conexión. Un error aquí es recuperable: el acceptor lo
    /// registra y vuelve a intentar.
    fn accept(&self) -> io::Result<(Self::Stream, SocketAddr)>;
}

/// Conexión aceptada con dueño único.
///
/// Se mueve de la cola al worker; quien termina de procesarla la cierra con
/// `close()` (o al soltarla).
#[derive(Debug)]
pub struct ConnectionHandle<S> {
    id: u64,
    stream: S,
    peer: SocketAddr,
    accepted_at: Instant,
}

impl<S: Connection> ConnectionHandle<S> {
    pub fn new(id: u64, stream: S, peer: SocketAddr) -> Self {
        Self {
            id,
            stream,
            peer,
            accepted_at: Instant::now(),
        }
    }

    /// Número de conexión asignado por el acceptor
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Momento en que se aceptó (para latencia total, incluida la espera en cola)
    pub fn accepted_at(&self) -> Instant {
        self.accepted_at
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Cierra la conexión y libera el stream
    pub fn close(self) {
        if let Err(e) = self.stream.shutdown() {
            // El peer ya pudo haber cerrado: no es un error del servidor
            tracing::trace!(conn = self.id, peer = %self.peer, error = %e, "shutdown failed");
        }
    }
}
