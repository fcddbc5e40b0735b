// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{markup, ActivityTrack, Lap, PowerReading, Trackpoint};


const GPX_NS: &str = "http://www.topografix.com/GPX/1/1";
const GPXDATA_NS: &str = "http://www.cluetrust.com/XML/GPXDATA/1/0";
const GPXTPX_NS: &str =
  "http://www.garmin.com/xmlschemas/TrackPointExtension/v1";
const SCHEMA_LOCATION: &str =
  "http://www.topografix.com/GPX/1/1 \
   http://www.topografix.com/GPX/1/1/gpx.xsd \
   http://www.cluetrust.com/XML/GPXDATA/1/0 \
   http://www.cluetrust.com/Schemas/gpxdata10.xsd \
   http://www.garmin.com/xmlschemas/TrackPointExtension/v1 \
   http://www.garmin.com/xmlschemas/TrackPointExtensionv1.xsd";


/// Renders an activity track as a GPX 1.1 document with `gpxdata` and
/// `gpxtpx` extension namespaces. Pure mapping: all numeric values come
/// from the track as-is.
pub fn render(track: &ActivityTrack) -> String {
  let mut gpx = String::with_capacity(4096);

  gpx.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
  gpx.push_str(&format!(
    "<gpx version=\"1.1\" creator=\"{}\"\n     \
     xmlns=\"{}\"\n     \
     xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n     \
     xmlns:gpxdata=\"{}\"\n     \
     xmlns:gpxtpx=\"{}\"\n     \
     xsi:schemaLocation=\"{}\">\n",
    markup::escape(track.creator()),
    GPX_NS,
    GPXDATA_NS,
    GPXTPX_NS,
    SCHEMA_LOCATION
  ));

  gpx.push_str("  <metadata>\n");
  gpx.push_str(&format!("    <time>{}</time>\n",
                        markup::iso8601(track.start_time())));
  gpx.push_str("  </metadata>\n");

  gpx.push_str("  <trk>\n");
  gpx.push_str(&format!("    <name>{}</name>\n",
                        markup::escape(track.activity_name())));
  gpx.push_str("    <type>1</type>\n");
  gpx.push_str("    <trkseg>\n");
  for lap in track.laps() {
    for point in lap.trackpoints() {
      push_trackpoint(&mut gpx, point);
    }
  }
  gpx.push_str("    </trkseg>\n");
  gpx.push_str("  </trk>\n");

  gpx.push_str("  <extensions>\n");
  for lap in track.laps() {
    push_lap(&mut gpx, lap);
  }
  gpx.push_str("  </extensions>\n");

  gpx.push_str("</gpx>\n");
  gpx
}

fn push_trackpoint(gpx: &mut String, point: &Trackpoint) {
  gpx.push_str(&format!("      <trkpt lat=\"{:.8}\" lon=\"{:.8}\">\n",
                        point.position().latitude(),
                        point.position().longitude()));
  gpx.push_str(&format!("        <time>{}</time>\n",
                        markup::iso8601_millis(point.timestamp())));

  if let Some(elevation) = point.elevation_meters() {
    gpx.push_str(&format!("        <ele>{:.1}</ele>\n", elevation));
  }

  gpx.push_str("        <extensions>\n");

  if let Some(energy) = point.energy_kcal() {
    gpx.push_str(&format!(
      "          <gpxdata:energy>{}</gpxdata:energy>\n",
      energy
    ));
  }
  if let Some(vertical_speed) = point.vertical_speed_mps() {
    gpx.push_str(&format!(
      "          <gpxdata:verticalSpeed>{}</gpxdata:verticalSpeed>\n",
      vertical_speed
    ));
  }
  if let Some(cadence) = point.cadence_rpm() {
    gpx.push_str(&format!(
      "          <gpxdata:cadence>{}</gpxdata:cadence>\n",
      cadence
    ));
  }
  // out of range power is dropped here, unlike in TCX
  if let Some(PowerReading::Watts(watts)) = point.power() {
    gpx.push_str(&format!(
      "          <gpxdata:power>{}</gpxdata:power>\n",
      watts
    ));
  }
  if let Some(temperature) = point.temperature_celsius() {
    gpx.push_str(&format!(
      "          <gpxdata:temp>{}</gpxdata:temp>\n",
      temperature
    ));
  }
  if let Some(pressure) = point.sea_level_pressure_hpa() {
    gpx.push_str(&format!(
      "          <gpxdata:seaLevelPressure>{}</gpxdata:seaLevelPressure>\n",
      pressure
    ));
  }
  if let Some(speed) = point.speed_mps() {
    gpx.push_str(&format!(
      "          <gpxdata:speed>{}</gpxdata:speed>\n",
      markup::speed(speed)
    ));
  }
  if let Some(distance) = point.distance_meters() {
    gpx.push_str(&format!(
      "          <gpxdata:distance>{}</gpxdata:distance>\n",
      distance
    ));
  }

  if let Some(heart_rate) = point.heart_rate_bpm() {
    gpx.push_str("          <gpxtpx:TrackPointExtension>\n");
    gpx.push_str(&format!("            <gpxtpx:hr>{}</gpxtpx:hr>\n",
                          heart_rate));
    gpx.push_str("          </gpxtpx:TrackPointExtension>\n");
  }

  gpx.push_str("        </extensions>\n");
  gpx.push_str("      </trkpt>\n");
}

fn push_lap(gpx: &mut String, lap: &Lap) {
  gpx.push_str("    <gpxdata:lap>\n");
  gpx.push_str(&format!("      <gpxdata:index>{}</gpxdata:index>\n",
                        lap.index()));

  if let Some(start) = lap.start_position() {
    gpx.push_str(&format!(
      "      <gpxdata:startPoint lat=\"{:.8}\" lon=\"{:.8}\"/>\n",
      start.latitude(),
      start.longitude()
    ));
  }
  if let Some(end) = lap.end_position() {
    gpx.push_str(&format!(
      "      <gpxdata:endPoint lat=\"{:.8}\" lon=\"{:.8}\"/>\n",
      end.latitude(),
      end.longitude()
    ));
  }

  gpx.push_str(&format!(
    "      <gpxdata:startTime>{}</gpxdata:startTime>\n",
    markup::iso8601_millis(lap.start_time())
  ));
  gpx.push_str(&format!(
    "      <gpxdata:distance>{}</gpxdata:distance>\n",
    lap.distance_meters()
  ));
  gpx.push_str(&format!(
    "      <gpxdata:elapsedTime>{}</gpxdata:elapsedTime>\n",
    lap.elapsed_seconds()
  ));
  gpx.push_str("    </gpxdata:lap>\n");
}
