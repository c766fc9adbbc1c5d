//! Conexiones en memoria para los tests del acceptor y los workers.

use crate::net::{Connection, Listener};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Conexión falsa: entrega chunks predefinidos, guarda lo escrito y
/// recuerda si se cerró. Los clones comparten estado.
#[derive(Clone, Default)]
pub struct MockConnection {
    input: Arc<Mutex<VecDeque<io::Result<Vec<u8>>>>>,
    output: Arc<Mutex<Vec<u8>>>,
    closed: Arc<AtomicBool>,
}

impl MockConnection {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        let conn = Self::default();
        conn.input.lock().unwrap().extend(chunks.into_iter().map(Ok));
        conn
    }

    /// Conexión que entrega `data` en chunks de `size` bytes y luego EOF
    pub fn chunked(data: &[u8], size: usize) -> Self {
        Self::new(data.chunks(size).map(|c| c.to_vec()).collect())
    }

    /// Agrega un error de lectura después de los chunks
    pub fn then_fail(self, kind: io::ErrorKind) -> Self {
        self.input
            .lock()
            .unwrap()
            .push_back(Err(io::Error::new(kind, "mock read failure")));
        self
    }

    pub fn written(&self) -> Vec<u8> {
        self.output.lock().unwrap().clone()
    }

    pub fn written_text(&self) -> String {
        String::from_utf8_lossy(&self.written()).into_owned()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Read for MockConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut input = self.input.lock().unwrap();
        match input.pop_front() {
            None => Ok(0),
            Some(Err(e)) => Err(e),
            Some(Ok(mut chunk)) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    input.push_front(Ok(chunk.split_off(n)));
                }
                Ok(n)
            }
        }
    }
}

impl Write for MockConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.is_closed() {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        }
        self.output.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Connection for MockConnection {
    fn shutdown(&self) -> io::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Listener falso que entrega una lista fija de resultados de accept
#[derive(Default)]
pub struct MockListener {
    incoming: Mutex<VecDeque<io::Result<(MockConnection, SocketAddr)>>>,
}

impl MockListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, conn: MockConnection) {
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        self.incoming.lock().unwrap().push_back(Ok((conn, peer)));
    }

    pub fn push_error(&self, kind: io::ErrorKind) {
        self.incoming
            .lock()
            .unwrap()
            .push_back(Err(io::Error::new(kind, "mock accept failure")));
    }
}

impl Listener for MockListener {
    type Stream = MockConnection;

    fn accept(&self) -> io::Result<(MockConnection, SocketAddr)> {
        self.incoming
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(io::Error::new(io::ErrorKind::WouldBlock, "no pending connections")))
    }
}
