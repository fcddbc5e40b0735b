// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use chrono::{DateTime, Duration, NaiveDate, Utc};
use getset::Getters;
use serde::{Deserialize, Serialize};


/// Name and model of the device which recorded a log.
#[derive(Clone, Debug, PartialEq, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct DeviceInfo {
  name:  String,
  model: String,
}

impl DeviceInfo {
  pub fn new(name: String, model: String) -> Self {
    Self { name, model }
  }

  /// Creator string as it appears in the rendered output files.
  pub fn creator(&self) -> String {
    format!("{} {}", self.name, self.model)
  }
}


/// Calendar timestamp as stored by the device: milliseconds are counted from
/// the top of the minute, i.e. they cover both seconds and subseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarTime {
  pub year:   i32,
  pub month:  u32,
  pub day:    u32,
  pub hour:   u32,
  pub minute: u32,
  pub msec:   u32,
}

impl CalendarTime {
  pub fn new(year: i32,
             month: u32,
             day: u32,
             hour: u32,
             minute: u32,
             msec: u32)
             -> Self {
    Self { year,
           month,
           day,
           hour,
           minute,
           msec }
  }

  /// Resolves the calendar fields into an absolute UTC timestamp. Returns
  /// `None` if the fields do not name a real point in time.
  pub fn to_utc(&self) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
      .and_hms_opt(self.hour, self.minute, 0)?
      .checked_add_signed(Duration::milliseconds(i64::from(self.msec)))
      .map(|datetime| datetime.and_utc())
  }
}


/// One raw record from the device log stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Sample {
  /// Full GPS fix with altitude and its own calendar timestamp.
  GpsBase {
    /// Latitude in 1e-7 degree fixed point units.
    latitude:      i32,
    /// Longitude in 1e-7 degree fixed point units.
    longitude:     i32,
    /// Altitude in centimeters.
    altitude:      i32,
    utc_base_time: CalendarTime,
  },
  /// Differential GPS fix, coordinates only.
  GpsSmall {
    latitude:     i32,
    longitude:    i32,
    epoch_millis: i64,
  },
  /// Smallest GPS fix encoding, coordinates only.
  GpsTiny {
    latitude:     i32,
    longitude:    i32,
    epoch_millis: i64,
  },
  /// Lap or interval event marker.
  LapInfo {
    event_code: u8,
    /// Distance in meters, cumulative since the start of the activity.
    distance:   u32,
    /// Duration in milliseconds, cumulative since the start of the activity.
    duration:   u32,
    utc_time:   CalendarTime,
  },
  /// Bundle of simultaneous sensor readings taken on a fixed cadence.
  Periodic {
    values:   Vec<PeriodicValue>,
    utc_time: CalendarTime,
  },
}


/// One sensor reading inside a periodic sample, in its raw device encoding.
/// Scaling, valid ranges and sentinel values are applied downstream when a
/// trackpoint is built from the reading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PeriodicValue {
  Latitude(u32),
  Longitude(u32),
  Energy(u16),
  GpsSpeed(u16),
  Altitude(i32),
  VerticalSpeed(i32),
  HeartRate(u16),
  Cadence(u16),
  BikePower(u16),
  WristCadence(u16),
  Temperature(i32),
  SeaLevelPressure(u32),
  Speed(u16),
  Distance(u32),
  Time(u32),
}


/// One recorded activity as handed over by the device sync layer: device
/// info, log header and the ordered sample stream.
#[derive(Clone, Debug, PartialEq, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct LogEntry {
  device:        DeviceInfo,
  activity_name: String,
  start_time:    CalendarTime,
  samples:       Vec<Sample>,
}

impl LogEntry {
  pub fn new(device: DeviceInfo,
             activity_name: String,
             start_time: CalendarTime,
             samples: Vec<Sample>)
             -> Self {
    Self { device,
           activity_name,
           start_time,
           samples }
  }
}
