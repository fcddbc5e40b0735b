// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Author: Florian Eich <florian@bmc-labs.com>

mod gpx;
mod lap;
mod markup;
mod normalize;
mod position;
mod sample;
mod tcx;
mod track;
mod trackpoint;

pub use lap::{Lap, LapBoundary, LapEvent, LapStateMachine};
pub use markup::write_text;
pub use position::{Position, PositionTracker};
pub use sample::{CalendarTime, DeviceInfo, LogEntry, PeriodicValue, Sample};
pub use track::ActivityTrack;
pub use trackpoint::{PowerReading, Trackpoint, TrackpointBuilder};

/// Converts one recorded log entry into the canonical activity track.
pub fn convert_to_activity_track(log: &LogEntry) -> ActivityTrack {
  ActivityTrack::from_log(log)
}

/// Renders an activity track as a GPX 1.1 document.
pub fn render_gpx(track: &ActivityTrack) -> String {
  gpx::render(track)
}

/// Renders an activity track as a TrainingCenterDatabase v2 document.
pub fn render_tcx(track: &ActivityTrack) -> String {
  tcx::render(track)
}
