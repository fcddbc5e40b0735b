// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{Position, Trackpoint};
use chrono::{DateTime, Utc};
use getset::{CopyGetters, Getters};
use log::debug;
use serde::{Deserialize, Serialize};


/// Lap and interval event markers as encoded on lap info samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LapEvent {
  /// 0x00 - flips the in-lap flag, nothing else.
  Toggle,
  /// 0x1f - start of an automatic lap; distance and duration are always
  /// zero on this code, so no boundary is derived from it.
  AutoStart,
  /// 0x1e - end of an automatic lap, closes the running lap.
  AutoEnd,
  /// 0x01 - manually triggered lap, closes the running lap.
  Manual,
  /// 0x16 - interval start, informational only.
  IntervalStart,
  /// 0x15 - low intensity interval end, informational only.
  LowIntervalEnd,
  /// 0x14 - high intensity interval end, informational only.
  HighIntervalEnd,
}

impl LapEvent {
  pub fn from_code(code: u8) -> Option<Self> {
    match code {
      0x00 => Some(Self::Toggle),
      0x1f => Some(Self::AutoStart),
      0x1e => Some(Self::AutoEnd),
      0x01 => Some(Self::Manual),
      0x16 => Some(Self::IntervalStart),
      0x15 => Some(Self::LowIntervalEnd),
      0x14 => Some(Self::HighIntervalEnd),
      _ => None,
    }
  }
}


/// Marks the end of one lap and the start of the next. Distance and
/// duration are cumulative since the start of the activity; the lap which
/// ends here owns the delta to the previous boundary.
#[derive(Clone, Debug, PartialEq, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
pub struct LapBoundary {
  index:                      usize,
  event:                      LapEvent,
  start_position:             Option<Position>,
  end_position:               Option<Position>,
  timestamp:                  DateTime<Utc>,
  cumulative_distance_meters: u32,
  cumulative_duration_millis: u32,
}


/// Interprets lap event codes into lap boundaries. Holds the recorded lap
/// start (position and time) between events; positions come from the last
/// known GPS fix at event time.
#[derive(Debug, Default, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct LapStateMachine {
  in_lap:         bool,
  start_position: Option<Position>,
  start_time:     Option<DateTime<Utc>>,
  boundaries:     usize,
}

impl LapStateMachine {
  pub fn new() -> Self {
    Self::default()
  }

  /// Applies one lap info sample. Returns a boundary for the codes which
  /// close a lap; all other codes, including unrecognized ones, only update
  /// internal state or are ignored.
  pub fn apply(&mut self,
               code: u8,
               distance: u32,
               duration: u32,
               timestamp: DateTime<Utc>,
               current: Option<Position>)
               -> Option<LapBoundary> {
    let event = match LapEvent::from_code(code) {
      Some(event) => event,
      None => {
        debug!("ignoring unrecognized lap event code 0x{:02x}", code);
        return None;
      }
    };

    match event {
      LapEvent::Toggle => {
        self.in_lap = !self.in_lap;
        None
      }
      LapEvent::AutoStart => {
        self.in_lap = true;
        self.start_position = current;
        self.start_time = Some(timestamp);
        None
      }
      LapEvent::AutoEnd | LapEvent::Manual => {
        if event == LapEvent::AutoEnd {
          self.in_lap = false;
        } else {
          self.in_lap = !self.in_lap;
        }

        let boundary =
          LapBoundary { index: self.boundaries,
                        event,
                        start_position: self.start_position,
                        end_position: current,
                        timestamp,
                        cumulative_distance_meters: distance,
                        cumulative_duration_millis: duration };

        // the next lap starts where and when this one ended
        self.start_position = current;
        self.start_time = Some(timestamp);
        self.boundaries += 1;

        Some(boundary)
      }
      LapEvent::IntervalStart => {
        debug!("lap interval start");
        None
      }
      LapEvent::LowIntervalEnd => {
        debug!("lap low interval end");
        None
      }
      LapEvent::HighIntervalEnd => {
        debug!("lap high interval end");
        None
      }
    }
  }
}


/// One lap of the canonical activity track, owning its trackpoints. Totals
/// are final: they were spliced in from the boundary which closed the lap,
/// or from end-of-stream state for the last lap.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters, Serialize,
         Deserialize)]
pub struct Lap {
  #[getset(get_copy = "pub")]
  index:           usize,
  #[getset(get_copy = "pub")]
  start_time:      DateTime<Utc>,
  #[getset(get_copy = "pub")]
  start_position:  Option<Position>,
  #[getset(get_copy = "pub")]
  end_position:    Option<Position>,
  #[getset(get_copy = "pub")]
  elapsed_seconds: f64,
  #[getset(get_copy = "pub")]
  distance_meters: f64,
  #[getset(get_copy = "pub")]
  manual:          bool,
  #[getset(get = "pub")]
  trackpoints:     Vec<Trackpoint>,
}

impl Lap {
  /// Opens a lap with zeroed totals. The totals stay zero until the closing
  /// boundary or the end of the stream delivers them.
  pub(crate) fn open(index: usize,
                     start_time: DateTime<Utc>,
                     start_position: Option<Position>)
                     -> Self {
    Self { index,
           start_time,
           start_position,
           end_position: None,
           elapsed_seconds: 0.0,
           distance_meters: 0.0,
           manual: false,
           trackpoints: Vec::new() }
  }

  pub(crate) fn push_trackpoint(&mut self, trackpoint: Trackpoint) {
    self.trackpoints.push(trackpoint);
  }

  /// Splices in the final totals and end position of this lap.
  pub(crate) fn finalize(&mut self,
                         distance_meters: f64,
                         elapsed_seconds: f64,
                         end_position: Option<Position>,
                         manual: bool) {
    self.distance_meters = distance_meters;
    self.elapsed_seconds = elapsed_seconds;
    self.end_position = end_position;
    self.manual = manual;
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use pretty_assertions::assert_eq;


  fn timestamp(seconds: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 7, 21, 14, 30, seconds).unwrap()
  }

  #[test]
  fn lap_event_test() {
    assert_eq!(Some(LapEvent::Toggle), LapEvent::from_code(0x00));
    assert_eq!(Some(LapEvent::AutoStart), LapEvent::from_code(0x1f));
    assert_eq!(Some(LapEvent::AutoEnd), LapEvent::from_code(0x1e));
    assert_eq!(Some(LapEvent::Manual), LapEvent::from_code(0x01));
    assert_eq!(Some(LapEvent::IntervalStart), LapEvent::from_code(0x16));
    assert_eq!(Some(LapEvent::LowIntervalEnd), LapEvent::from_code(0x15));
    assert_eq!(Some(LapEvent::HighIntervalEnd), LapEvent::from_code(0x14));
    assert_eq!(None, LapEvent::from_code(0x42));
  }

  #[test]
  fn manual_lap_test() {
    let mut machine = LapStateMachine::new();
    let start = Position::new(52.1, 4.3);
    let end = Position::new(52.2, 4.4);

    // auto start records the lap opening, no boundary
    assert_eq!(None, machine.apply(0x1f, 0, 0, timestamp(0), Some(start)));
    assert_eq!(true, machine.in_lap());
    assert_eq!(Some(start), machine.start_position());
    assert_eq!(Some(timestamp(0)), machine.start_time());

    let boundary = machine.apply(0x01, 500, 120_000, timestamp(2), Some(end))
                          .unwrap();
    assert_eq!(0, boundary.index());
    assert_eq!(LapEvent::Manual, boundary.event());
    assert_eq!(Some(start), boundary.start_position());
    assert_eq!(Some(end), boundary.end_position());
    assert_eq!(500, boundary.cumulative_distance_meters());
    assert_eq!(120_000, boundary.cumulative_duration_millis());

    // the closed lap's end becomes the next lap's start
    let boundary = machine.apply(0x01, 1200, 240_000, timestamp(4), None)
                          .unwrap();
    assert_eq!(1, boundary.index());
    assert_eq!(Some(end), boundary.start_position());
    assert_eq!(None, boundary.end_position());
  }

  #[test]
  fn auto_lap_test() {
    let mut machine = LapStateMachine::new();
    let position = Position::new(52.1, 4.3);

    assert_eq!(None, machine.apply(0x1f, 0, 0, timestamp(0), Some(position)));

    let boundary =
      machine.apply(0x1e, 350, 90_000, timestamp(1), None).unwrap();
    assert_eq!(LapEvent::AutoEnd, boundary.event());
    assert_eq!(Some(position), boundary.start_position());
    assert_eq!(350, boundary.cumulative_distance_meters());
  }

  #[test]
  fn informational_codes_test() {
    let mut machine = LapStateMachine::new();

    // toggle, intervals and unknown codes never emit a boundary
    assert_eq!(None, machine.apply(0x00, 0, 0, timestamp(0), None));
    assert_eq!(true, machine.in_lap());
    assert_eq!(None, machine.apply(0x16, 0, 0, timestamp(1), None));
    assert_eq!(None, machine.apply(0x15, 0, 0, timestamp(2), None));
    assert_eq!(None, machine.apply(0x14, 0, 0, timestamp(3), None));
    assert_eq!(None, machine.apply(0x42, 0, 0, timestamp(4), None));
    assert_eq!(None, machine.apply(0xff, 123, 456, timestamp(5), None));
  }

  #[test]
  fn lap_lifecycle_test() {
    let mut lap = Lap::open(0, timestamp(0), Some(Position::new(52.1, 4.3)));
    assert_eq!(0, lap.index());
    assert_eq!(0.0, lap.distance_meters());
    assert_eq!(0.0, lap.elapsed_seconds());
    assert_eq!(false, lap.manual());
    assert_eq!(0, lap.trackpoints().len());

    lap.finalize(500.0, 120.0, Some(Position::new(52.2, 4.4)), true);
    assert_eq!(500.0, lap.distance_meters());
    assert_eq!(120.0, lap.elapsed_seconds());
    assert_eq!(Some(Position::new(52.2, 4.4)), lap.end_position());
    assert_eq!(true, lap.manual());
  }
}
