//! Pollutant Index Converter: PM2.5 concentration to US EPA AQI.
//!
//! The index is a piecewise-linear interpolation over six breakpoints:
//!
//! | PM2.5 (ug/m3) | AQI     |
//! |---------------|---------|
//! | 0.0-12.0      | 0-50    |
//! | 12.1-35.4     | 51-100  |
//! | 35.5-55.4     | 101-150 |
//! | 55.5-150.4    | 151-200 |
//! | 150.5-250.4   | 201-300 |
//! | 250.5-500.4   | 301-500 |
//!
//! Within a segment:
//!
//! ```text
//! AQI = (AQI_high - AQI_low) / (C_high - C_low) * (C - C_low) + AQI_low
//! ```
//!
//! rounded to the nearest integer. A concentration falling in the 0.1-wide
//! gap between two segments is interpolated on the higher segment. Negative
//! or NaN input yields 0; anything above 500.4 saturates at [`MAX_AQI`].
//!
//! The converter is pure. It labels live state as well as every point of a
//! forecast trajectory.

/// Highest index value the scale defines.
pub const MAX_AQI: u32 = 500;

/// One segment of the PM2.5 index table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AqiBreakpoint {
    /// Lowest concentration of the segment, in ug/m3.
    pub concentration_low: f64,
    /// Highest concentration of the segment, in ug/m3.
    pub concentration_high: f64,
    /// Index value at `concentration_low`.
    pub aqi_low: u32,
    /// Index value at `concentration_high`.
    pub aqi_high: u32,
}

impl AqiBreakpoint {
    /// Linearly interpolate `concentration` on this segment.
    fn interpolate(&self, concentration: f64) -> f64 {
        let aqi_span = f64::from(self.aqi_high.saturating_sub(self.aqi_low));
        let concentration_span = self.concentration_high - self.concentration_low;
        aqi_span / concentration_span * (concentration - self.concentration_low)
            + f64::from(self.aqi_low)
    }
}

/// PM2.5 breakpoint table, ordered by concentration.
pub const PM25_BREAKPOINTS: [AqiBreakpoint; 6] = [
    segment(0.0, 12.0, 0, 50),
    segment(12.1, 35.4, 51, 100),
    segment(35.5, 55.4, 101, 150),
    segment(55.5, 150.4, 151, 200),
    segment(150.5, 250.4, 201, 300),
    segment(250.5, 500.4, 301, 500),
];

const fn segment(
    concentration_low: f64,
    concentration_high: f64,
    aqi_low: u32,
    aqi_high: u32,
) -> AqiBreakpoint {
    AqiBreakpoint {
        concentration_low,
        concentration_high,
        aqi_low,
        aqi_high,
    }
}

/// Convert a PM2.5 concentration (ug/m3) into an AQI value in `[0, 500]`.
pub fn compute_aqi(pm25: f64) -> u32 {
    if pm25.is_nan() || pm25 <= 0.0 {
        return 0;
    }

    let Some(segment) = PM25_BREAKPOINTS
        .iter()
        .find(|segment| pm25 <= segment.concentration_high)
    else {
        return MAX_AQI;
    };

    to_index(segment.interpolate(pm25).round())
}

/// Convert a rounded index value into an integer within `[0, MAX_AQI]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_index(value: f64) -> u32 {
    // Clamped first, so the cast is exact.
    value.clamp(0.0, f64::from(MAX_AQI)) as u32
}
