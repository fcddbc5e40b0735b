// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{normalize,
            Lap,
            LapBoundary,
            LapEvent,
            LapStateMachine,
            LogEntry,
            PositionTracker,
            Sample,
            TrackpointBuilder};
use chrono::{DateTime, Utc};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};


/// The canonical, format independent activity model. Produced once per log
/// entry and consumed identically by every renderer. Laps are ordered by
/// start time and there is always at least one of them; a log without any
/// lap event yields the whole track as one implicit lap.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters, Serialize,
         Deserialize)]
pub struct ActivityTrack {
  #[getset(get = "pub")]
  creator:       String,
  #[getset(get = "pub")]
  activity_name: String,
  #[getset(get_copy = "pub")]
  start_time:    DateTime<Utc>,
  #[getset(get = "pub")]
  laps:          Vec<Lap>,
}

impl ActivityTrack {
  /// Converts a log entry into the canonical activity track. Never fails:
  /// malformed fields degrade to absent values, an empty sample stream
  /// yields a track with one empty lap.
  pub fn from_log(log: &LogEntry) -> Self {
    Aggregator::new(log).run()
  }

  pub fn trackpoint_count(&self) -> usize {
    self.laps.iter().map(|lap| lap.trackpoints().len()).sum()
  }
}


/// Drives the sample stream once, in order, feeding the position tracker,
/// the lap state machine and the trackpoint builder, and splicing lap
/// totals in as they become known.
struct Aggregator<'a> {
  log:               &'a LogEntry,
  positions:         PositionTracker,
  machine:           LapStateMachine,
  builder:           TrackpointBuilder,
  laps:              Vec<Lap>,
  open:              Lap,
  /// Last successfully resolved sample timestamp; samples with
  /// unresolvable time fields reuse it.
  clock:             DateTime<Utc>,
  last_boundary:     DateTime<Utc>,
  prior_distance:    u32,
  prior_duration_ms: u32,
}

impl<'a> Aggregator<'a> {
  fn new(log: &'a LogEntry) -> Self {
    let start_time = log.start_time()
                        .to_utc()
                        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    Self { log,
           positions: PositionTracker::new(),
           machine: LapStateMachine::new(),
           builder: TrackpointBuilder::new(),
           laps: Vec::new(),
           open: Lap::open(0, start_time, None),
           clock: start_time,
           last_boundary: start_time,
           prior_distance: 0,
           prior_duration_ms: 0 }
  }

  fn run(mut self) -> ActivityTrack {
    for sample in self.log.samples() {
      if let Some(timestamp) = normalize::timestamp(sample) {
        self.clock = timestamp;
      }

      match sample {
        Sample::GpsBase { altitude, .. } => {
          self.positions.observe(sample);
          if let Some(meters) = normalize::base_altitude_meters(*altitude) {
            self.builder.seed_elevation(meters);
          }
        }
        Sample::GpsSmall { .. } | Sample::GpsTiny { .. } => {
          self.positions.observe(sample);
        }
        Sample::LapInfo { event_code,
                          distance,
                          duration,
                          .. } => {
          let boundary = self.machine.apply(*event_code,
                                            *distance,
                                            *duration,
                                            self.clock,
                                            self.positions.current());
          if let Some(boundary) = boundary {
            self.close_lap(&boundary);
          }
        }
        Sample::Periodic { values, .. } => {
          match self.positions.current() {
            Some(position) => {
              let point = self.builder.build(values, self.clock, position);
              self.open.push_trackpoint(point);
            }
            // no fix yet: drop the point but keep the running totals fed
            None => self.builder.absorb(values),
          }
        }
      }
    }

    self.flush()
  }

  /// Splices the totals delivered by a boundary into the lap it closes and
  /// opens the next lap at the boundary.
  fn close_lap(&mut self, boundary: &LapBoundary) {
    let distance = boundary.cumulative_distance_meters()
                           .saturating_sub(self.prior_distance);
    let elapsed = boundary.cumulative_duration_millis()
                          .saturating_sub(self.prior_duration_ms);

    self.open.finalize(f64::from(distance),
                       f64::from(elapsed) / 1000.0,
                       boundary.end_position(),
                       boundary.event() == LapEvent::Manual);

    let index = self.open.index() + 1;
    let closed = std::mem::replace(&mut self.open,
                                   Lap::open(index,
                                             boundary.timestamp(),
                                             boundary.end_position()));
    self.laps.push(closed);

    self.prior_distance = boundary.cumulative_distance_meters();
    self.prior_duration_ms = boundary.cumulative_duration_millis();
    self.last_boundary = boundary.timestamp();
  }

  /// Finalizes the still open lap from end-of-stream state: its distance is
  /// whatever the track accumulated beyond the laps already closed, its
  /// duration the wall clock since the last boundary.
  fn flush(mut self) -> ActivityTrack {
    let distance =
      self.builder.track_distance() - f64::from(self.prior_distance);
    let elapsed = (self.clock - self.last_boundary).num_milliseconds() as f64
                  / 1000.0;

    self.open.finalize(distance,
                       elapsed,
                       self.positions.current(),
                       false);
    self.laps.push(self.open);

    ActivityTrack { creator:       self.log.device().creator(),
                    activity_name: self.log.activity_name().clone(),
                    start_time:    self.laps[0].start_time(),
                    laps:          self.laps, }
  }
}
