//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Cuenta lo que pasa con cada conexión: aceptada, admitida o rechazada,
//! cómo terminó la acumulación del request y qué status se respondió.

use crate::frame::AccumulateOutcome;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Máximo de latencias a guardar (para calcular percentiles)
const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
#[derive(Default)]
struct MetricsData {
    accepted: u64,
    accept_errors: u64,
    rejected: u64,

    complete: u64,
    oversized: u64,
    peer_closed: u64,
    read_errors: u64,
    write_errors: u64,

    /// Respuestas por código de estado
    status_codes: BTreeMap<u16, u64>,

    /// Últimas latencias (microsegundos, desde el accept)
    latencies: VecDeque<u64>,

    /// Workers atendiendo una conexión ahora mismo
    busy_workers: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData::default())),
            start_time: Instant::now(),
        }
    }

    fn data(&self) -> MutexGuard<'_, MetricsData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record_accepted(&self) {
        self.data().accepted += 1;
    }

    pub fn record_accept_error(&self) {
        self.data().accept_errors += 1;
    }

    /// Conexión cerrada por cola llena (política `reject`)
    pub fn record_rejected(&self) {
        self.data().rejected += 1;
    }

    /// Registra cómo terminó la acumulación de un request
    pub fn record_outcome(&self, outcome: &AccumulateOutcome) {
        let mut data = self.data();
        match outcome {
            AccumulateOutcome::Complete(_) => data.complete += 1,
            AccumulateOutcome::Oversized => data.oversized += 1,
            AccumulateOutcome::PeerClosed => data.peer_closed += 1,
            AccumulateOutcome::ReadError(_) => data.read_errors += 1,
        }
    }

    /// Registra una respuesta enviada
    pub fn record_response(&self, status_code: u16, latency: Duration) {
        let mut data = self.data();

        *data.status_codes.entry(status_code).or_insert(0) += 1;

        if data.latencies.len() >= MAX_LATENCY_SAMPLES {
            data.latencies.pop_front();
        }
        data.latencies.push_back(latency.as_micros() as u64);
    }

    pub fn record_write_error(&self) {
        self.data().write_errors += 1;
    }

    pub fn worker_busy(&self) {
        self.data().busy_workers += 1;
    }

    pub fn worker_idle(&self) {
        let mut data = self.data();
        data.busy_workers = data.busy_workers.saturating_sub(1);
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.data();
        let latency = LatencySummary::from_samples(&data.latencies);

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            accepted: data.accepted,
            accept_errors: data.accept_errors,
            rejected: data.rejected,
            complete: data.complete,
            oversized: data.oversized,
            peer_closed: data.peer_closed,
            read_errors: data.read_errors,
            write_errors: data.write_errors,
            busy_workers: data.busy_workers,
            status_codes: data.status_codes.clone(),
            latency_us: latency,
        }
    }

    /// Snapshot en JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot de métricas (para uso externo)
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub accepted: u64,
    pub accept_errors: u64,
    pub rejected: u64,
    pub complete: u64,
    pub oversized: u64,
    pub peer_closed: u64,
    pub read_errors: u64,
    pub write_errors: u64,
    pub busy_workers: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub latency_us: LatencySummary,
}

/// Percentiles de latencia en microsegundos
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub avg: u64,
    pub samples: usize,
}

impl LatencySummary {
    fn from_samples(latencies: &VecDeque<u64>) -> Self {
        if latencies.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<u64> = latencies.iter().copied().collect();
        sorted.sort_unstable();

        let len = sorted.len();
        let sum: u64 = sorted.iter().sum();

        Self {
            p50: sorted[len * 50 / 100],
            p95: sorted[len * 95 / 100],
            p99: sorted[len * 99 / 100],
            avg: sum / len as u64,
            samples: len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_outcomes() {
        let collector = MetricsCollector::new();

        collector.record_outcome(&AccumulateOutcome::Complete(b"GET / HTTP/1.0\r\n\r\n".to_vec()));
        collector.record_outcome(&AccumulateOutcome::Complete(Vec::new()));
        collector.record_outcome(&AccumulateOutcome::Oversized);
        collector.record_outcome(&AccumulateOutcome::PeerClosed);
        collector.record_outcome(&AccumulateOutcome::ReadError(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        )));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.complete, 2);
        assert_eq!(snapshot.oversized, 1);
        assert_eq!(snapshot.peer_closed, 1);
        assert_eq!(snapshot.read_errors, 1);
    }

    #[test]
    fn test_admission_counters() {
        let collector = MetricsCollector::new();

        collector.record_accepted();
        collector.record_accepted();
        collector.record_rejected();
        collector.record_accept_error();

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.accepted, 2);
        assert_eq!(snapshot.rejected, 1);
        assert_eq!(snapshot.accept_errors, 1);
    }

    #[test]
    fn test_percentiles() {
        let collector = MetricsCollector::new();

        for i in 1..=100 {
            collector.record_response(200, Duration::from_micros(i));
        }

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.latency_us.samples, 100);
        assert!(snapshot.latency_us.p50 > 0);
        assert!(snapshot.latency_us.p95 > snapshot.latency_us.p50);
        assert!(snapshot.latency_us.p99 > snapshot.latency_us.p95);
        assert_eq!(snapshot.status_codes.get(&200), Some(&100));
    }

    #[test]
    fn test_latency_window_is_bounded() {
        let collector = MetricsCollector::new();

        for i in 0..(MAX_LATENCY_SAMPLES as u64 + 500) {
            collector.record_response(404, Duration::from_micros(i));
        }

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.latency_us.samples, MAX_LATENCY_SAMPLES);
        assert_eq!(snapshot.status_codes.get(&404), Some(&(MAX_LATENCY_SAMPLES as u64 + 500)));
    }

    #[test]
    fn test_busy_workers_no_negative() {
        let collector = MetricsCollector::new();

        collector.worker_busy();
        collector.worker_busy();
        assert_eq!(collector.snapshot().busy_workers, 2);

        collector.worker_idle();
        collector.worker_idle();
        collector.worker_idle();
        assert_eq!(collector.snapshot().busy_workers, 0);
    }

    #[test]
    fn test_json_format() {
        let collector = MetricsCollector::new();
        collector.record_response(413, Duration::from_millis(1));
        collector.record_outcome(&AccumulateOutcome::Oversized);

        let value: serde_json::Value = serde_json::from_str(&collector.to_json()).unwrap();
        assert_eq!(value["oversized"], 1);
        assert_eq!(value["status_codes"]["413"], 1);
        assert_eq!(value["latency_us"]["samples"], 1);
    }
}
