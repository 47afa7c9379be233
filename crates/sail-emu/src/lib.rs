/// Sailing vessel telemetry emulation library.
///
/// *Models* produce streams of instrument readings by implementing [`model::InstrumentStream`].
/// The [`emitter::Emitter`] serializes each sample as a [`frame::Frame`] and writes it to a
/// serial port in the wire format the downstream controller expects.
use std::sync::Once;

use thiserror::Error;

pub mod emitter;
pub mod frame;
pub mod model;

/// Result type for this library
pub type EmuResult<T> = std::result::Result<T, Error>;

/// Error type for this library
#[derive(Debug, Error)]
pub enum Error {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),
}

/// Test binary helper to init tracing. This is usually the responsibility of the consumer of the
/// library crate.
pub fn lazy_init_tracing() {
    {
        static INIT: Once = Once::new();
        &INIT
    }
    .call_once(|| {
        tracing_subscriber::fmt::init();
    });
}
