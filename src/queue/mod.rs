//! # Cola de Conexiones
//! src/queue/mod.rs
//!
//! Cola acotada entre el acceptor y el pool de workers, con la compuerta de
//! admisión y las dos políticas de saturación (`block` y `reject`).

pub mod admission;
pub mod bounded;

pub use admission::{AdmissionPolicy, EnqueueError};
pub use bounded::{BoundedQueue, QueueStats};
