//! # Acceptor
//! src/server/acceptor.rs
//!
//! Un único thread que acepta conexiones y las pasa a la cola. Con la
//! política `block` se queda esperando un lugar libre; con `reject` cierra la
//! conexión sin escribir nada y sigue aceptando.

use crate::metrics::MetricsCollector;
use crate::net::{ConnectionHandle, Listener};
use crate::queue::{BoundedQueue, EnqueueError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Pausa tras un accept fallido, para no girar en vacío si el error persiste
/// (por ejemplo, sin descriptores libres)
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Resultado de un intento de accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// Conexión encolada
    Admitted(u64),
    /// Cola llena con política `reject`: conexión cerrada
    Rejected(u64),
    /// El accept falló
    Failed,
}

pub struct Acceptor<L: Listener> {
    listener: L,
    queue: Arc<BoundedQueue<ConnectionHandle<L::Stream>>>,
    metrics: MetricsCollector,
    next_id: u64,
}

impl<L: Listener> Acceptor<L> {
    pub fn new(
        listener: L,
        queue: Arc<BoundedQueue<ConnectionHandle<L::Stream>>>,
        metrics: MetricsCollector,
    ) -> Self {
        Self {
            listener,
            queue,
            metrics,
            next_id: 1,
        }
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Acepta una conexión y la entrega a la cola según la política
    pub fn accept_one(&mut self) -> AcceptOutcome {
        let (stream, peer) = match self.listener.accept() {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                self.metrics.record_accept_error();
                return AcceptOutcome::Failed;
            }
        };

        let id = self.next_id;
        self.next_id += 1;
        self.metrics.record_accepted();
        tracing::debug!(conn = id, peer = %peer, "accepted");

        match self.queue.enqueue(ConnectionHandle::new(id, stream, peer)) {
            Ok(()) => AcceptOutcome::Admitted(id),
            Err(EnqueueError::Full(handle)) => {
                handle.close();
                self.metrics.record_rejected();
                tracing::warn!(
                    conn = id,
                    peer = %peer,
                    capacity = self.queue.capacity(),
                    "queue full, connection rejected"
                );
                AcceptOutcome::Rejected(id)
            }
        }
    }

    /// Acepta conexiones para siempre
    pub fn run(&mut self) -> ! {
        tracing::info!(
            capacity = self.queue.capacity(),
            policy = %self.queue.policy(),
            "acceptor running"
        );

        loop {
            if self.accept_one() == AcceptOutcome::Failed {
                thread::sleep(ACCEPT_BACKOFF);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::AdmissionPolicy;
    use crate::server::mock::{MockConnection, MockListener};
    use crate::server::worker::{serve_connection, Dispatch};
    use crate::http::{Response, StatusCode};
    use std::io;

    struct Ok200;

    impl Dispatch for Ok200 {
        fn dispatch(&self, _frame: &[u8]) -> Response {
            Response::new(StatusCode::Ok).with_body(b"hello".to_vec())
        }
    }

    fn request() -> MockConnection {
        MockConnection::chunked(b"GET / HTTP/1.1\r\n\r\n", 4)
    }

    fn acceptor(capacity: usize, policy: AdmissionPolicy) -> Acceptor<MockListener> {
        let queue = Arc::new(BoundedQueue::new(capacity, policy));
        Acceptor::new(MockListener::new(), queue, MetricsCollector::new())
    }

    #[test]
    fn test_reject_policy_closes_overflow_without_writing() {
        let mut acceptor = acceptor(2, AdmissionPolicy::Reject);
        let conns = [request(), request(), request()];
        for conn in &conns {
            acceptor.listener().push(conn.clone());
        }

        assert_eq!(acceptor.accept_one(), AcceptOutcome::Admitted(1));
        assert_eq!(acceptor.accept_one(), AcceptOutcome::Admitted(2));
        assert_eq!(acceptor.accept_one(), AcceptOutcome::Rejected(3));

        // La tercera se cerró sin respuesta; las dos primeras siguen en cola
        assert!(conns[2].is_closed());
        assert!(conns[2].written().is_empty());
        assert!(!conns[0].is_closed());
        assert_eq!(acceptor.queue.len(), 2);

        let snapshot = acceptor.metrics.snapshot();
        assert_eq!(snapshot.accepted, 3);
        assert_eq!(snapshot.rejected, 1);

        // Cuando un worker las toma, se atienden normalmente
        for conn in &conns[..2] {
            let handle = acceptor.queue.try_dequeue().unwrap();
            let status = serve_connection(handle, &Ok200, &acceptor.metrics, 8192);
            assert_eq!(status, Some(StatusCode::Ok));
            assert!(conn.written_text().starts_with("HTTP/1.1 200 OK"));
        }
        assert!(acceptor.queue.is_empty());
    }

    #[test]
    fn test_rejected_slot_frees_after_dequeue() {
        let mut acceptor = acceptor(1, AdmissionPolicy::Reject);
        for _ in 0..3 {
            acceptor.listener().push(request());
        }

        assert_eq!(acceptor.accept_one(), AcceptOutcome::Admitted(1));
        assert_eq!(acceptor.accept_one(), AcceptOutcome::Rejected(2));

        let first = acceptor.queue.try_dequeue().unwrap();
        assert_eq!(first.id(), 1);
        assert_eq!(acceptor.accept_one(), AcceptOutcome::Admitted(3));
    }

    #[test]
    fn test_block_policy_waits_for_worker() {
        let queue = Arc::new(BoundedQueue::new(1, AdmissionPolicy::Block));
        let mut acceptor = Acceptor::new(MockListener::new(), Arc::clone(&queue), MetricsCollector::new());
        acceptor.listener().push(request());
        acceptor.listener().push(request());

        assert_eq!(acceptor.accept_one(), AcceptOutcome::Admitted(1));

        // Un consumidor libera el único lugar un poco después
        let consumer = {
            let queue = Arc::clone(&queue);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(100));
                let first = queue.dequeue();
                let second = queue.dequeue();
                (first.id(), second.id())
            })
        };

        assert_eq!(acceptor.accept_one(), AcceptOutcome::Admitted(2));
        assert_eq!(consumer.join().unwrap(), (1, 2));
        assert_eq!(acceptor.metrics.snapshot().rejected, 0);
    }

    #[test]
    fn test_accept_error_is_recoverable() {
        let mut acceptor = acceptor(4, AdmissionPolicy::Block);
        acceptor.listener().push_error(io::ErrorKind::ConnectionAborted);
        acceptor.listener().push(request());

        assert_eq!(acceptor.accept_one(), AcceptOutcome::Failed);
        assert_eq!(acceptor.accept_one(), AcceptOutcome::Admitted(1));

        let snapshot = acceptor.metrics.snapshot();
        assert_eq!(snapshot.accept_errors, 1);
        assert_eq!(snapshot.accepted, 1);
    }
}
