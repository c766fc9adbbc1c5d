//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Recolección de métricas del servidor:
//! - Conexiones aceptadas, rechazadas y errores de accept
//! - Resultado de cada acumulación (completo, demasiado grande, cierre, error)
//! - Respuestas por status y latencias (p50, p95, p99)
//! - Workers ocupados

pub mod collector;

pub use collector::{LatencySummary, MetricsCollector, MetricsSnapshot};
