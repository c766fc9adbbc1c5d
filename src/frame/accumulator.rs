//! # Acumulador de Frames
//! src/frame/accumulator.rs
//!
//! Convierte el flujo de bytes de una conexión en un request completo.
//!
//! Un `read()` de TCP puede traer medio request, o el terminador `\r\n\r\n`
//! partido entre dos lecturas. Por eso cada lectura se agrega al buffer y se
//! vuelve a buscar el terminador en la zona donde pudo haber quedado partido.
//!
//! ```text
//! read #1: "GET /a HTTP/1.1\r\nHost: x\r"
//! read #2: "\n\r\n"            <- el terminador se completa aquí
//! ```

use std::io::{ErrorKind, Read};

/// Línea en blanco que cierra los headers
pub const TERMINATOR: &[u8] = b"\r\n\r\n";

/// Capacidad por defecto de un frame (bytes)
pub const DEFAULT_MAX_FRAME_BYTES: usize = 8192;

/// Tamaño de cada lectura individual
pub const READ_CHUNK_SIZE: usize = 1024;

/// Estado del frame después de agregar bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameProgress {
    /// Aún no aparece el terminador y queda espacio
    Incomplete,

    /// Se encontró el terminador dentro de la capacidad
    Complete,

    /// Se llenó la capacidad sin encontrar el terminador
    Oversized,
}

/// Buffer por conexión con capacidad máxima declarada.
///
/// Se crea uno nuevo por cada conexión y solo lo toca el worker que la atiende.
#[derive(Debug)]
pub struct PartialFrame {
    /// Bytes acumulados (nunca más de `capacity`)
    buf: Vec<u8>,

    capacity: usize,

    /// Bytes ya revisados en búsquedas anteriores
    scanned: usize,

    /// Longitud del frame incluyendo el terminador, una vez completo
    frame_len: Option<usize>,

    oversized: bool,
}

impl PartialFrame {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity.min(READ_CHUNK_SIZE)),
            capacity,
            scanned: 0,
            frame_len: None,
            oversized: false,
        }
    }

    /// Agrega bytes recién leídos y busca el terminador.
    ///
    /// Nunca escribe más allá de la capacidad: si el chunk no cabe, se guarda
    /// solo lo que cabe. Si el terminador quedó dentro de esa parte el frame
    /// está completo; si no, es `Oversized`. Ambos estados son finales.
    pub fn push(&mut self, chunk: &[u8]) -> FrameProgress {
        if self.frame_len.is_some() {
            return FrameProgress::Complete;
        }
        if self.oversized {
            return FrameProgress::Oversized;
        }

        let room = self.capacity - self.buf.len();
        let take = chunk.len().min(room);
        self.buf.extend_from_slice(&chunk[..take]);

        // El terminador pudo empezar en los últimos 3 bytes ya revisados
        let start = self.scanned.saturating_sub(TERMINATOR.len() - 1);
        if let Some(pos) = find_terminator(&self.buf[start..]) {
            self.frame_len = Some(start + pos + TERMINATOR.len());
            return FrameProgress::Complete;
        }
        self.scanned = self.buf.len();

        if take < chunk.len() || self.buf.len() >= self.capacity {
            self.oversized = true;
            return FrameProgress::Oversized;
        }

        FrameProgress::Incomplete
    }

    pub fn is_complete(&self) -> bool {
        self.frame_len.is_some()
    }

    pub fn is_oversized(&self) -> bool {
        self.oversized
    }

    /// Bytes acumulados hasta ahora
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume el acumulador y devuelve el frame.
    ///
    /// Si está completo, retorna los bytes hasta el terminador inclusive
    /// (lo que llegó después se descarta: no hay pipelining). Si no, `None`.
    pub fn into_frame(mut self) -> Option<Vec<u8>> {
        let len = self.frame_len?;
        self.buf.truncate(len);
        Some(self.buf)
    }
}

/// Posición del primer terminador en `haystack`
fn find_terminator(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(TERMINATOR.len())
        .position(|window| window == TERMINATOR)
}

/// Resultado de acumular un request de una conexión
#[derive(Debug)]
pub enum AccumulateOutcome {
    /// Request completo (hasta `\r\n\r\n` inclusive)
    Complete(Vec<u8>),

    /// Se superó la capacidad sin ver el terminador
    Oversized,

    /// El cliente cerró antes de completar el request
    PeerClosed,

    /// Falló una lectura
    ReadError(std::io::Error),
}

impl AccumulateOutcome {
    /// Nombre corto del resultado (para logs y métricas)
    pub fn kind(&self) -> &'static str {
        match self {
            AccumulateOutcome::Complete(_) => "complete",
            AccumulateOutcome::Oversized => "oversized",
            AccumulateOutcome::PeerClosed => "peer_closed",
            AccumulateOutcome::ReadError(_) => "read_error",
        }
    }
}

/// Lee de `reader` hasta tener un request completo o hasta que no se pueda.
///
/// - `Ok(0)` → `PeerClosed`
/// - error de lectura → `ReadError` (salvo `Interrupted`, que se reintenta)
/// - capacidad agotada sin terminador → `Oversized`, sin más lecturas
/// - terminador encontrado → `Complete`, sin más lecturas
pub fn accumulate<R: Read + ?Sized>(reader: &mut R, capacity: usize) -> AccumulateOutcome {
    let mut frame = PartialFrame::new(capacity);
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        let bytes_read = match reader.read(&mut chunk) {
            Ok(0) => return AccumulateOutcome::PeerClosed,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return AccumulateOutcome::ReadError(e),
        };

        match frame.push(&chunk[..bytes_read]) {
            FrameProgress::Incomplete => continue,
            FrameProgress::Oversized => return AccumulateOutcome::Oversized,
            FrameProgress::Complete => {
                return match frame.into_frame() {
                    Some(bytes) => AccumulateOutcome::Complete(bytes),
                    None => AccumulateOutcome::Oversized,
                };
            }
        }
    }
}
