/// Telemetry frame wire format.
///
/// The downstream controller scans the serial byte stream for a leading `x` and a trailing `d`;
/// everything between is 17 fields joined by `", "`. There is no length prefix, checksum, or
/// newline. Fragile as that is, the controller depends on it, so the layout is preserved
/// byte-for-byte.
use std::io::{self, Write};

use crate::model::Readings;

//  _____
// |_   _|   _ _ __   ___  ___
//   | || | | | '_ \ / _ \/ __|
//   | || |_| | |_) |  __/\__ \
//   |_| \__, | .__/ \___||___/
//       |___/|_|

/// Number of fields in one frame.
pub const FIELD_COUNT: usize = 17;

/// Frame start sentinel.
pub const START_CHAR: u8 = b'x';

/// Frame end sentinel.
pub const END_CHAR: u8 = b'd';

/// Field delimiter.
pub const DELIMITER: &str = ", ";

/// Literal text of the first six fields. The firmware reserved these positions for values it
/// never wired up; the controller expects the text verbatim regardless of instrument state.
const PLACEHOLDERS: [&str; 6] = ["gps_aprs_lat", "gps_aprs_lon", "0", "0", "100", "0"];

/// One complete telemetry line. Built fresh from a [`Readings`] sample on every emit iteration;
/// nothing is retained between frames.
#[derive(Debug)]
pub struct Frame {
    readings: Readings,
}

impl Frame {
    pub fn new(readings: Readings) -> Self {
        Self { readings }
    }

    /// The 17 field values in wire order, as text. Numeric fields use their decimal `Display`
    /// form, so integral floats print without a fractional part.
    pub fn fields(&self) -> [String; FIELD_COUNT] {
        let r = &self.readings;
        [
            PLACEHOLDERS[0].to_string(),
            PLACEHOLDERS[1].to_string(),
            PLACEHOLDERS[2].to_string(),
            PLACEHOLDERS[3].to_string(),
            PLACEHOLDERS[4].to_string(),
            PLACEHOLDERS[5].to_string(),
            r.gps_course.to_string(),
            r.ahrs_heading.to_string(),
            r.current_roll.to_string(),
            r.heel_adjust.to_string(),
            r.wind.to_string(),
            r.wp_heading.to_string(),
            r.wp_distance.to_string(),
            r.current_rudder.to_string(),
            r.current_winch.to_string(),
            r.voltage.to_string(),
            r.cycle.to_string(),
        ]
    }

    /// Write the frame to `w`, one blocking write per token: start sentinel, then each field
    /// with its delimiter, then the end sentinel. An error aborts mid-frame.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[START_CHAR])?;
        for (i, field) in self.fields().iter().enumerate() {
            if i > 0 {
                w.write_all(DELIMITER.as_bytes())?;
            }
            w.write_all(field.as_bytes())?;
        }
        w.write_all(&[END_CHAR])
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_to(&mut buf).unwrap();
        buf
    }
}
