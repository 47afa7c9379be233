/// The telemetry emitter: owns the serial connection and drives the emit loop.
use std::io::Write;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::{
    frame::Frame,
    model::{InstrumentStream, TimeDelta},
    EmuResult,
};

/// Device path the radio's USB-to-UART bridge enumerates as.
pub const DEFAULT_DEVICE: &str = "/dev/tty.SLAB_USBtoUART";

/// Line rate of the radio link.
pub const BAUD_RATE: u32 = 9600;

/// How long a run lasts.
#[derive(Debug, Clone, Copy)]
pub enum RunLimit {
    /// Loop forever. Production behavior; only a write failure ends the run.
    Unbounded,
    /// Emit exactly this many frames, then return. Bounded hook for tests and bench runs.
    Frames(u64),
}

/// Open the telemetry serial device: 9600 baud, 8-N-1, no flow control.
///
/// The write timeout stands in for fully blocking writes: serialport's default timeout of zero
/// would error as soon as the OS buffer fills, while 10 s cannot fire at 9600 baud with frame
/// sized tokens. If it ever does fire, the error is fatal like any other write failure.
pub fn open_port(path: &str) -> EmuResult<Box<dyn SerialPort>> {
    let port = serialport::new(path, BAUD_RATE)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .flow_control(FlowControl::None)
        .timeout(Duration::from_secs(10))
        .open()?;
    info!("opened {} at {} baud", path, BAUD_RATE);
    Ok(port)
}

/// Writes one [`Frame`] per sample from an [`InstrumentStream`] to its sink. Generic over the
/// sink so tests can capture output in memory; production wraps the opened serial port, which
/// closes on drop when the process ends.
pub struct Emitter<W: Write> {
    sink: W,
}

impl Emitter<Box<dyn SerialPort>> {
    /// Open `path` and build an emitter around it. Fails fast if the device is unavailable, so
    /// nothing is ever emitted to a half-open connection.
    pub fn open(path: &str) -> EmuResult<Self> {
        Ok(Self::new(open_port(path)?))
    }
}

impl<W: Write> Emitter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Emit frames from `source` until `limit` is reached. Writes are blocking and unpaced; the
    /// device's serial buffer is the only backpressure. Any write error aborts the run.
    pub fn run<S: InstrumentStream>(&mut self, source: &mut S, limit: RunLimit) -> EmuResult<()> {
        let mut emitted: u64 = 0;
        loop {
            if let RunLimit::Frames(n) = limit {
                if emitted >= n {
                    debug!("run limit of {} frames reached", n);
                    return Ok(());
                }
            }
            let readings = source.next(TimeDelta::default());
            Frame::new(readings).write_to(&mut self.sink)?;
            emitted += 1;
            debug!("emitted frame {}", emitted);
        }
    }

    /// Consume the emitter, handing back the sink.
    pub fn into_sink(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        frame::{DELIMITER, END_CHAR, FIELD_COUNT, START_CHAR},
        lazy_init_tracing,
        model::{FixedReadings, Readings},
        Error,
    };
    use std::io;

    fn test_source() -> FixedReadings {
        FixedReadings::new(Readings {
            gps_course: 180.0,
            voltage: 12.4,
            cycle: 1,
            ..Readings::default()
        })
    }

    #[test]
    fn test_bounded_run_emits_exact_frame_count() {
        lazy_init_tracing();
        let mut emitter = Emitter::new(Vec::new());
        emitter.run(&mut test_source(), RunLimit::Frames(3)).unwrap();
        let bytes = emitter.into_sink();

        // three back-to-back frames, no separator between them
        let text = String::from_utf8(bytes).unwrap();
        let frames: Vec<&str> = text
            .split(END_CHAR as char)
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(frames.len(), 3);
        for frame in frames {
            assert!(frame.starts_with(START_CHAR as char));
            assert_eq!(frame[1..].split(DELIMITER).count(), FIELD_COUNT);
        }
    }

    #[test]
    fn test_zero_frame_run_writes_nothing() {
        lazy_init_tracing();
        let mut emitter = Emitter::new(Vec::new());
        emitter.run(&mut test_source(), RunLimit::Frames(0)).unwrap();
        assert!(emitter.into_sink().is_empty());
    }

    /// Sink that fails on the first write, like an unplugged radio.
    struct BrokenSink;

    impl io::Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_aborts_run() {
        lazy_init_tracing();
        let mut emitter = Emitter::new(BrokenSink);
        let err = emitter
            .run(&mut test_source(), RunLimit::Unbounded)
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_open_missing_device_fails_fast() {
        lazy_init_tracing();
        // drop the emitter so the Ok arm needs no Debug impl
        let err = Emitter::open("/dev/does-not-exist-sail-emu")
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, Error::Serial(_)));
    }
}
