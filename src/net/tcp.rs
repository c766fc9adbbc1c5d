//! # Implementación TCP
//! src/net/tcp.rs
//!
//! `TcpListener`/`TcpStream` como colaboradores del núcleo. El timeout de
//! lectura (si se configuró) se aplica aquí, al aceptar cada conexión.

use super::connection::{Connection, Listener};
use std::io;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

impl Connection for TcpStream {
    fn shutdown(&self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

/// Listener TCP que configura cada stream aceptado
#[derive(Debug)]
pub struct TcpAcceptor {
    listener: TcpListener,
    read_timeout: Option<Duration>,
}

impl TcpAcceptor {
    pub fn new(listener: TcpListener, read_timeout: Option<Duration>) -> Self {
        Self {
            listener,
            read_timeout,
        }
    }

    /// Hace bind a `address` (resuelve nombres e IPv4/IPv6)
    pub fn bind<A: ToSocketAddrs>(address: A, read_timeout: Option<Duration>) -> io::Result<Self> {
        let listener = TcpListener::bind(address)?;
        Ok(Self::new(listener, read_timeout))
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Listener for TcpAcceptor {
    type Stream = TcpStream;

    fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        let (stream, peer) = self.listener.accept()?;
        if self.read_timeout.is_some() {
            stream.set_read_timeout(self.read_timeout)?;
        }
        Ok((stream, peer))
    }
}
