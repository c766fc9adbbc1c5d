//! # Pool de Workers
//! src/server/worker.rs
//!
//! N threads creados al arrancar que viven hasta que termina el proceso.
//! Cada uno repite:
//!
//! ```text
//! dequeue → acumular request → despachar (o 413) → responder → cerrar
//! ```
//!
//! Si el cliente cierra o falla una lectura antes de completar el request,
//! la conexión se cierra sin responder y el worker sigue con la siguiente.

use crate::frame::{accumulate, AccumulateOutcome};
use crate::http::{Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::net::{Connection, ConnectionHandle};
use crate::queue::BoundedQueue;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Colaborador que convierte un request completo en una respuesta
pub trait Dispatch: Send + Sync + 'static {
    /// Respuesta para un frame completo (hasta `\r\n\r\n` inclusive)
    fn dispatch(&self, frame: &[u8]) -> Response;

    /// Respuesta para un request cuya cabecera no cupo en el frame
    fn payload_too_large(&self) -> Response {
        Response::error(
            StatusCode::PayloadTooLarge,
            "Request header exceeds the maximum size",
        )
    }
}

/// Pool de workers de tamaño fijo
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Lanza `size` workers que consumen de `queue`
    pub fn spawn<S, D>(
        size: usize,
        queue: Arc<BoundedQueue<ConnectionHandle<S>>>,
        dispatcher: Arc<D>,
        metrics: MetricsCollector,
        max_frame_bytes: usize,
    ) -> io::Result<Self>
    where
        S: Connection,
        D: Dispatch,
    {
        let mut handles = Vec::with_capacity(size);

        for i in 0..size {
            let name = format!("worker-{}", i);
            let queue = Arc::clone(&queue);
            let dispatcher = Arc::clone(&dispatcher);
            let metrics = metrics.clone();

            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || worker_loop(&name, &queue, &*dispatcher, &metrics, max_frame_bytes))?;
            handles.push(handle);
        }

        Ok(Self { handles })
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }
}

/// Loop principal del worker
fn worker_loop<S: Connection, D: Dispatch>(
    name: &str,
    queue: &BoundedQueue<ConnectionHandle<S>>,
    dispatcher: &D,
    metrics: &MetricsCollector,
    max_frame_bytes: usize,
) {
    tracing::debug!(worker = name, "worker started");

    loop {
        let handle = queue.dequeue();
        let conn = handle.id();

        metrics.worker_busy();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            serve_connection(handle, dispatcher, metrics, max_frame_bytes)
        }));
        metrics.worker_idle();

        if result.is_err() {
            tracing::error!(worker = name, conn, "panic while serving connection");
        }
    }
}

/// Atiende una conexión de principio a fin y la cierra.
///
/// Retorna el status enviado, o `None` si la conexión se abandonó antes de
/// tener un request completo.
pub fn serve_connection<S, D>(
    mut handle: ConnectionHandle<S>,
    dispatcher: &D,
    metrics: &MetricsCollector,
    max_frame_bytes: usize,
) -> Option<StatusCode>
where
    S: Connection,
    D: Dispatch + ?Sized,
{
    let outcome = accumulate(handle.stream_mut(), max_frame_bytes);
    metrics.record_outcome(&outcome);

    let (mut response, request_line) = match outcome {
        AccumulateOutcome::Complete(frame) => (dispatcher.dispatch(&frame), request_line(&frame)),
        AccumulateOutcome::Oversized => (dispatcher.payload_too_large(), String::from("-")),
        AccumulateOutcome::PeerClosed => {
            tracing::debug!(conn = handle.id(), peer = %handle.peer(), "peer closed before complete request");
            handle.close();
            return None;
        }
        AccumulateOutcome::ReadError(e) => {
            tracing::warn!(conn = handle.id(), peer = %handle.peer(), error = %e, "read failed");
            handle.close();
            return None;
        }
    };

    add_common_headers(&mut response);

    let status = response.status();
    if let Err(e) = write_response(handle.stream_mut(), &response) {
        tracing::warn!(conn = handle.id(), peer = %handle.peer(), error = %e, "write failed");
        metrics.record_write_error();
    }

    let latency = handle.accepted_at().elapsed();
    metrics.record_response(status.as_u16(), latency);

    tracing::info!(
        conn = handle.id(),
        peer = %handle.peer(),
        request = %request_line,
        status = status.as_u16(),
        latency_ms = latency.as_secs_f64() * 1000.0,
        "served"
    );

    handle.close();
    Some(status)
}

fn write_response<W: Write>(stream: &mut W, response: &Response) -> io::Result<()> {
    stream.write_all(&response.to_bytes())?;
    stream.flush()
}

/// Headers comunes a todas las respuestas
fn add_common_headers(response: &mut Response) {
    response.add_header("Server", "file_server/0.1");
    response.add_header("Connection", "close");
}

/// Primera línea del request para los logs
fn request_line(frame: &[u8]) -> String {
    let end = frame
        .windows(2)
        .position(|w| w == b"\r\n")
        .unwrap_or(frame.len())
        .min(200);
    String::from_utf8_lossy(&frame[..end]).into_owned()
}
