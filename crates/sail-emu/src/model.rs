/// Simulated models of a sailing vessel's instruments, used to generate a stream of telemetry
/// readings.
///
/// The real firmware sourced these values from GPS, AHRS, wind vane, rudder and winch servos,
/// and the battery monitor. Here they are produced by an [`InstrumentStream`] so the emitter
/// never depends on ambient state.
use std::time::Duration;

use tracing::debug;

//  _____
// |_   _|   _ _ __   ___  ___
//   | || | | | '_ \ / _ \/ __|
//   | || |_| | |_) |  __/\__ \
//   |_| \__, | .__/ \___||___/
//       |___/|_|

/// One sample of every instrument the telemetry frame carries, in frame order.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Readings {
    pub gps_course: f32,
    pub ahrs_heading: f32,
    pub current_roll: f32,
    pub heel_adjust: f32,
    pub wind: f32,
    pub wp_heading: f32,
    pub wp_distance: f32,
    pub current_rudder: f32,
    pub current_winch: f32,
    pub voltage: f32,
    pub cycle: u32,
}

/// API for a stream of instrument readings.
pub trait InstrumentStream {
    fn next(&mut self, delta_t: TimeDelta) -> Readings;
}

/// Time delta since last sample, with [`Default`] and conversion from [`Duration`] for
/// convenience.
pub struct TimeDelta {
    msec: u32,
}

impl Default for TimeDelta {
    fn default() -> Self {
        Self { msec: 1000 }
    }
}

impl From<Duration> for TimeDelta {
    fn from(d: Duration) -> Self {
        Self {
            msec: d.as_millis() as u32,
        }
    }
}

impl TimeDelta {
    pub fn seconds(&self) -> f32 {
        self.msec as f32 / 1000.0
    }
}

/// Wrap an angle into [0, 360). Assumes the input is within one revolution of range. Unlike the
/// firmware's wrap, 360.0 itself maps to 0.0 so the range stays half-open.
fn to_circle_deg(value: f32) -> f32 {
    if value >= 360.0 {
        value - 360.0
    } else if value < 0.0 {
        value + 360.0
    } else {
        value
    }
}

//  _____ _              _
// |  ___(_)_  _____  __| |
// | |_  | \ \/ / _ \/ _` |
// |  _| | |>  <  __/ (_| |
// |_|   |_/_/\_\___|\__,_|

/// Returns the same sample forever. Used in tests and for deterministic bench runs.
pub struct FixedReadings {
    readings: Readings,
}

impl FixedReadings {
    pub fn new(readings: Readings) -> Self {
        Self { readings }
    }
}

impl InstrumentStream for FixedReadings {
    fn next(&mut self, _delta_t: TimeDelta) -> Readings {
        self.readings
    }
}

//  ____  _             ____        _ _
// / ___|(_)_ __ ___   / ___|  __ _(_) |
// \___ \| | '_ ` _ \  \___ \ / _` | | |
//  ___) | | | | | | |  ___) | (_| | | |
// |____/|_|_| |_| |_| |____/ \__,_|_|_|

/// Super simple drifting-vessel model. Not realistic, but every value stays in a plausible
/// instrument range.
pub struct SimSail {
    course: f32,
    heading: f32,
    wind: f32,
    wp_heading: f32,
    wp_distance_m: f32,
    rudder: f32,
    winch: f32,
    voltage: f32,
    cycle: u32,
}

/// Boat speed used to close on the waypoint, meters per second.
const SIM_SPEED_MPS: f32 = 2.0;

/// Waypoint distance the model resets to after "arriving".
const SIM_LEG_M: f32 = 1000.0;

impl SimSail {
    pub fn new() -> Self {
        let heading = rand::random::<f32>() * 360.0;
        Self {
            course: heading,
            heading,
            wind: rand::random::<f32>() * 360.0,
            wp_heading: rand::random::<f32>() * 360.0,
            wp_distance_m: SIM_LEG_M,
            rudder: 0.0,
            winch: 20.0,
            voltage: 12.8,
            cycle: 0,
        }
    }
}

impl Default for SimSail {
    fn default() -> Self {
        Self::new()
    }
}

impl InstrumentStream for SimSail {
    fn next(&mut self, delta_t: TimeDelta) -> Readings {
        let dt = delta_t.seconds();

        let turn = (rand::random::<f32>() - 0.5) * 10.0 * dt;
        self.heading = to_circle_deg(self.heading + turn);
        debug!("heading after {} turn: {}", turn, self.heading);
        // course lags the heading, with a little gps jitter
        self.course = to_circle_deg(self.course + turn * 0.5 + (rand::random::<f32>() - 0.5) * 2.0);
        self.wind = to_circle_deg(self.wind + (rand::random::<f32>() - 0.5) * 4.0 * dt);

        // heel follows a slow oscillation; heel_adjust trims half of it
        let roll = (self.cycle as f32 * 0.1).sin() * 15.0;
        let heel_adjust = roll * 0.5;

        self.wp_distance_m -= SIM_SPEED_MPS * dt;
        if self.wp_distance_m <= 0.0 {
            debug!("waypoint reached, starting new {} m leg", SIM_LEG_M);
            self.wp_heading = rand::random::<f32>() * 360.0;
            self.wp_distance_m = SIM_LEG_M;
        }

        self.rudder = (self.rudder + (rand::random::<f32>() - 0.5) * 6.0 * dt).clamp(-45.0, 45.0);
        self.winch = (self.winch + (rand::random::<f32>() - 0.5) * 4.0 * dt).clamp(0.0, 40.0);
        // battery sags slowly under load, never below cutoff
        self.voltage = (self.voltage - 0.0002 * dt).max(11.0);
        self.cycle += 1;

        Readings {
            gps_course: self.course,
            ahrs_heading: self.heading,
            current_roll: roll,
            heel_adjust,
            wind: self.wind,
            wp_heading: self.wp_heading,
            wp_distance: self.wp_distance_m,
            current_rudder: self.rudder,
            current_winch: self.winch,
            voltage: self.voltage,
            cycle: self.cycle,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lazy_init_tracing;
    use tracing::trace;

    #[test]
    fn test_to_circle_deg() {
        assert_eq!(to_circle_deg(0.0), 0.0);
        assert_eq!(to_circle_deg(359.5), 359.5);
        assert_eq!(to_circle_deg(360.0), 0.0);
        assert_eq!(to_circle_deg(365.0), 5.0);
        assert_eq!(to_circle_deg(-10.0), 350.0);
    }

    #[test]
    fn test_sim_sail_bounds() {
        lazy_init_tracing();
        let mut sim = SimSail::new();
        let mut last_cycle = 0;
        for _ in 0..500 {
            let r = sim.next(Duration::new(1, 0).into());
            trace!("readings: {:?}", r);
            assert!((0.0..360.0).contains(&r.ahrs_heading));
            assert!((0.0..360.0).contains(&r.gps_course));
            assert!((0.0..360.0).contains(&r.wind));
            assert!((0.0..360.0).contains(&r.wp_heading));
            assert!(r.wp_distance > 0.0 && r.wp_distance <= SIM_LEG_M);
            assert!((-45.0..=45.0).contains(&r.current_rudder));
            assert!((0.0..=40.0).contains(&r.current_winch));
            assert!(r.voltage >= 11.0);
            assert!(r.cycle > last_cycle);
            last_cycle = r.cycle;
        }
    }

    #[test]
    fn test_fixed_readings_is_constant() {
        lazy_init_tracing();
        let readings = Readings {
            voltage: 12.6,
            cycle: 7,
            ..Readings::default()
        };
        let mut fixed = FixedReadings::new(readings);
        for _ in 0..10 {
            assert_eq!(fixed.next(TimeDelta::default()), readings);
        }
    }
}
