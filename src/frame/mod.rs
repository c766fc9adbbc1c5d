//! # Framing de Requests
//! src/frame/mod.rs
//!
//! Acumula lecturas parciales de una conexión hasta observar la línea en
//! blanco que cierra los headers (`\r\n\r\n`).

pub mod accumulator;

pub use accumulator::{
    accumulate, AccumulateOutcome, FrameProgress, PartialFrame, DEFAULT_MAX_FRAME_BYTES,
    TERMINATOR,
};
