/// Binary entry point: emit simulated instrument telemetry to a serial device, forever.
///
/// Takes one optional argument, the device path, defaulting to the path the radio's
/// USB-to-UART bridge enumerates as. Any open or write failure is fatal.
use std::process::ExitCode;

use tracing::{error, info};

use sail_emu::{
    emitter::{Emitter, RunLimit, DEFAULT_DEVICE},
    model::SimSail,
    EmuResult,
};

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let device = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DEVICE.to_string());
    match run(&device) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("telemetry emitter failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(device: &str) -> EmuResult<()> {
    info!("emulating instrument telemetry on {}", device);
    let mut emitter = Emitter::open(device)?;
    let mut vessel = SimSail::new();
    emitter.run(&mut vessel, RunLimit::Unbounded)
}
