// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Author: Florian Eich <florian@bmc-labs.com>

use super::Sample;
use chrono::{DateTime, Utc};


/// Divisor from the device's fixed point coordinates to degrees. Division
/// rounds correctly where multiplying by 1e-7 drifts by one ulp.
const COORDINATE_DIVISOR: f64 = 10_000_000.0;

/// Altitude readings outside this band (in meters) are rejected.
pub const ALTITUDE_MIN: f64 = -1000.0;
pub const ALTITUDE_MAX: f64 = 15000.0;


/// Converts a raw fixed point coordinate to degrees.
pub fn coordinate_degrees(raw: i32) -> f64 {
  f64::from(raw) / COORDINATE_DIVISOR
}

/// Converts a raw base fix altitude (centimeters) to meters, rejecting
/// readings outside the valid band.
pub fn base_altitude_meters(raw: i32) -> Option<f64> {
  let meters = f64::from(raw) * 0.01;
  if (ALTITUDE_MIN..=ALTITUDE_MAX).contains(&meters) {
    Some(meters)
  } else {
    None
  }
}

/// Resolves the absolute UTC timestamp of a sample. Base fixes and event
/// samples carry calendar fields, small and tiny fixes a millisecond epoch
/// which is reinterpreted as absolute UTC. `None` means the fields were
/// unresolvable; the sample is still processed with the last known clock.
pub fn timestamp(sample: &Sample) -> Option<DateTime<Utc>> {
  match sample {
    Sample::GpsBase { utc_base_time, .. } => utc_base_time.to_utc(),
    Sample::GpsSmall { epoch_millis, .. }
    | Sample::GpsTiny { epoch_millis, .. } => {
      DateTime::from_timestamp_millis(*epoch_millis)
    }
    Sample::LapInfo { utc_time, .. } | Sample::Periodic { utc_time, .. } => {
      utc_time.to_utc()
    }
  }
}
