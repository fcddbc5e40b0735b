// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{normalize, Sample};
use getset::CopyGetters;
use serde::{Deserialize, Serialize};


/// Geographical coordinate in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
pub struct Position {
  latitude:  f64,
  longitude: f64,
}

impl Position {
  pub fn new(latitude: f64, longitude: f64) -> Self {
    Self { latitude,
           longitude }
  }

  /// Builds a position from raw fixed point device coordinates.
  pub fn from_raw(latitude: i32, longitude: i32) -> Self {
    Self::new(normalize::coordinate_degrees(latitude),
              normalize::coordinate_degrees(longitude))
  }
}


/// Maintains the last known GPS fix across the sample stream. The position
/// is unknown until the first GPS sample arrives; after that a stale fix is
/// used indefinitely until replaced. No averaging or smoothing is applied.
#[derive(Debug, Default, PartialEq)]
pub struct PositionTracker {
  current: Option<Position>,
}

impl PositionTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replaces the current fix if the sample is a GPS variant; any other
  /// sample type leaves the tracker untouched.
  pub fn observe(&mut self, sample: &Sample) {
    match *sample {
      Sample::GpsBase { latitude,
                        longitude,
                        .. }
      | Sample::GpsSmall { latitude,
                           longitude,
                           .. }
      | Sample::GpsTiny { latitude,
                          longitude,
                          .. } => {
        self.current = Some(Position::from_raw(latitude, longitude));
      }
      _ => (),
    }
  }

  pub fn current(&self) -> Option<Position> {
    self.current
  }
}
