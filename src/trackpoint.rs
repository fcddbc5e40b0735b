// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{PeriodicValue, Position};
use chrono::{DateTime, Utc};
use getset::CopyGetters;
use log::debug;
use serde::{Deserialize, Serialize};


const HR_SENTINEL: u16 = 0xff;
const CADENCE_SENTINEL: u16 = 0xff;
const WORD_SENTINEL: u16 = 0xffff;
const DWORD_SENTINEL: u32 = 0xffff_ffff;
const DISTANCE_SENTINEL_ALT: u32 = 0x0b40_0000;

const HR_MAX: u16 = 300;
const CADENCE_MAX: u16 = 1000;
const POWER_MAX: u16 = 2000;
const ENERGY_MAX: u16 = 1000;

/// Raw altitude and vertical speed readings share this valid band.
const ALTITUDE_RAW_MIN: i32 = -1000;
const ALTITUDE_RAW_MAX: i32 = 15000;


/// A power reading survives into the model even when out of range because
/// the two output schemas disagree on how to render it: GPX drops it, TCX
/// reports 0 watts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerReading {
  Watts(u16),
  OutOfRange,
}


/// One output-ready point of the activity track. Every metric is optional:
/// `None` means the metric was never reported for this point. Sentinel
/// filtered readings of heart rate, cadence, speed, distance and wrist
/// cadence are reported as 0, matching the device convention.
#[derive(Clone, Debug, PartialEq, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
pub struct Trackpoint {
  timestamp:              DateTime<Utc>,
  position:               Position,
  elevation_meters:       Option<f64>,
  heart_rate_bpm:         Option<u16>,
  cadence_rpm:            Option<u16>,
  power:                  Option<PowerReading>,
  speed_mps:              Option<f64>,
  temperature_celsius:    Option<i32>,
  distance_meters:        Option<u32>,
  energy_kcal:            Option<f64>,
  vertical_speed_mps:     Option<f64>,
  sea_level_pressure_hpa: Option<u32>,
  wrist_cadence_rpm:      Option<u16>,
}


/// Turns periodic samples into trackpoints, applying per-metric scaling and
/// sentinel filtering. Carries running state across the stream: the last
/// valid elevation, the cumulative track distance and the accumulated time
/// counter.
#[derive(Debug, Default, PartialEq)]
pub struct TrackpointBuilder {
  elevation:       Option<f64>,
  track_distance:  f64,
  duration_millis: u64,
}

impl TrackpointBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seeds the elevation carry from a base GPS fix.
  pub fn seed_elevation(&mut self, meters: f64) {
    self.elevation = Some(meters);
  }

  /// Cumulative track distance in meters, as per the last valid distance
  /// reading seen anywhere in the stream.
  pub fn track_distance(&self) -> f64 {
    self.track_distance
  }

  /// Accumulated time readings in seconds.
  pub fn duration_seconds(&self) -> f64 {
    self.duration_millis as f64 / 1000.0
  }

  /// Feeds distance and time readings into the running totals without
  /// building a trackpoint. Used while no GPS fix has been observed yet:
  /// the point is dropped but the totals must not drift.
  pub fn absorb(&mut self, values: &[PeriodicValue]) {
    for value in values {
      match *value {
        PeriodicValue::Distance(raw) => {
          if raw != DWORD_SENTINEL && raw != DISTANCE_SENTINEL_ALT {
            self.track_distance = f64::from(raw);
          }
        }
        PeriodicValue::Time(raw) => self.duration_millis += u64::from(raw),
        _ => (),
      }
    }
  }

  /// Builds one trackpoint from a periodic sample's readings, the resolved
  /// timestamp and the current GPS fix. When a metric type occurs more than
  /// once in one sample, the last reading wins.
  pub fn build(&mut self,
               values: &[PeriodicValue],
               timestamp: DateTime<Utc>,
               position: Position)
               -> Trackpoint {
    let mut point = Trackpoint { timestamp,
                                 position,
                                 elevation_meters: self.elevation,
                                 heart_rate_bpm: None,
                                 cadence_rpm: None,
                                 power: None,
                                 speed_mps: None,
                                 temperature_celsius: None,
                                 distance_meters: None,
                                 energy_kcal: None,
                                 vertical_speed_mps: None,
                                 sea_level_pressure_hpa: None,
                                 wrist_cadence_rpm: None };

    for value in values {
      match *value {
        // longitude and latitude readings are advisory only, the
        // coordinate never reaches the output
        PeriodicValue::Longitude(raw) => {
          if raw != DWORD_SENTINEL && raw <= 180 {
            debug!("periodic longitude reading: {}",
                   f64::from(raw) / 10_000_000.0);
          }
        }
        PeriodicValue::Latitude(raw) => {
          if raw != DWORD_SENTINEL && raw <= 180 {
            debug!("periodic latitude reading: {}",
                   f64::from(raw) / 10_000_000.0);
          }
        }
        PeriodicValue::Energy(raw) => {
          // raw value 0 is excluded along with the out-of-range readings
          if raw > 0 && raw <= ENERGY_MAX {
            point.energy_kcal = Some(f64::from(raw) / 10.0);
          }
        }
        PeriodicValue::GpsSpeed(raw) => {
          // advisory only, not surfaced downstream
          if raw != WORD_SENTINEL {
            debug!("gps speed reading: {} m/s", f64::from(raw) * 0.01);
          }
        }
        PeriodicValue::Altitude(raw) => {
          if (ALTITUDE_RAW_MIN..=ALTITUDE_RAW_MAX).contains(&raw) {
            self.elevation = Some(f64::from(raw));
            point.elevation_meters = self.elevation;
          }
        }
        PeriodicValue::VerticalSpeed(raw) => {
          if (ALTITUDE_RAW_MIN..=ALTITUDE_RAW_MAX).contains(&raw) {
            point.vertical_speed_mps = Some(f64::from(raw) * 0.01);
          }
        }
        PeriodicValue::HeartRate(raw) => {
          point.heart_rate_bpm = if raw != HR_SENTINEL && raw < HR_MAX {
            Some(raw)
          } else {
            Some(0)
          };
        }
        PeriodicValue::Cadence(raw) => {
          point.cadence_rpm = if raw != CADENCE_SENTINEL && raw < CADENCE_MAX
          {
            Some(raw)
          } else {
            Some(0)
          };
        }
        PeriodicValue::BikePower(raw) => {
          point.power = if raw != WORD_SENTINEL && raw <= POWER_MAX {
            Some(PowerReading::Watts(raw))
          } else {
            Some(PowerReading::OutOfRange)
          };
        }
        PeriodicValue::WristCadence(raw) => {
          point.wrist_cadence_rpm = if raw != WORD_SENTINEL {
            Some(raw)
          } else {
            Some(0)
          };
        }
        PeriodicValue::Temperature(raw) => {
          point.temperature_celsius = Some(raw / 10);
        }
        PeriodicValue::SeaLevelPressure(raw) => {
          point.sea_level_pressure_hpa = Some(raw / 10);
        }
        PeriodicValue::Speed(raw) => {
          point.speed_mps = if raw != WORD_SENTINEL {
            Some(f64::from(raw) * 0.01)
          } else {
            Some(0.0)
          };
        }
        PeriodicValue::Distance(raw) => {
          point.distance_meters =
            if raw != DWORD_SENTINEL && raw != DISTANCE_SENTINEL_ALT {
              self.track_distance = f64::from(raw);
              Some(raw)
            } else {
              Some(0)
            };
        }
        PeriodicValue::Time(raw) => {
          self.duration_millis += u64::from(raw);
        }
      }
    }

    point
  }
}
