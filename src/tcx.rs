// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use super::{markup, ActivityTrack, Lap, PowerReading, Trackpoint};


const TCX_NS: &str =
  "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";
const TPX_NS: &str = "http://www.garmin.com/xmlschemas/ActivityExtension/v2";


/// Renders an activity track as a TrainingCenterDatabase v2 document. Only
/// the metric subset the TCX schema defines is emitted; everything else the
/// model carries is silently omitted here.
pub fn render(track: &ActivityTrack) -> String {
  let mut tcx = String::with_capacity(4096);

  tcx.push_str("<?xml version=\"1.0\"?>\n");
  tcx.push_str(&format!(
    "<TrainingCenterDatabase xmlns=\"{}\"\n                        \
     xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\n",
    TCX_NS
  ));
  tcx.push_str("  <Activities>\n");
  tcx.push_str(&format!("    <Activity Sport=\"{}\">\n",
                        markup::escape(track.activity_name())));
  tcx.push_str(&format!("      <Id>{}</Id>\n",
                        markup::iso8601(track.start_time())));

  for lap in track.laps() {
    push_lap(&mut tcx, lap);
  }

  tcx.push_str("      <Creator xsi:type=\"Device_t\">\n");
  tcx.push_str(&format!("        <Name>{}</Name>\n",
                        markup::escape(track.creator())));
  tcx.push_str("        <ProductId>0</ProductId>\n");
  tcx.push_str("        <UnitId>0</UnitId>\n");
  tcx.push_str("      </Creator>\n");

  tcx.push_str("    </Activity>\n");
  tcx.push_str("  </Activities>\n");
  tcx.push_str("</TrainingCenterDatabase>\n");
  tcx
}

fn push_lap(tcx: &mut String, lap: &Lap) {
  tcx.push_str(&format!("      <Lap StartTime=\"{}\">\n",
                        markup::iso8601(lap.start_time())));
  tcx.push_str(&format!(
    "        <TotalTimeSeconds>{}</TotalTimeSeconds>\n",
    lap.elapsed_seconds()
  ));
  tcx.push_str(&format!(
    "        <DistanceMeters>{}</DistanceMeters>\n",
    lap.distance_meters()
  ));
  tcx.push_str("        <Intensity>Active</Intensity>\n");
  tcx.push_str(&format!(
    "        <TriggerMethod>{}</TriggerMethod>\n",
    if lap.manual() { "Manual" } else { "Distance" }
  ));

  tcx.push_str("        <Track>\n");
  for point in lap.trackpoints() {
    push_trackpoint(tcx, point);
  }
  tcx.push_str("        </Track>\n");
  tcx.push_str("      </Lap>\n");
}

fn push_trackpoint(tcx: &mut String, point: &Trackpoint) {
  tcx.push_str("          <Trackpoint>\n");
  tcx.push_str(&format!("            <Time>{}</Time>\n",
                        markup::iso8601(point.timestamp())));

  tcx.push_str("            <Position>\n");
  tcx.push_str(&format!(
    "              <LatitudeDegrees>{:.8}</LatitudeDegrees>\n",
    point.position().latitude()
  ));
  tcx.push_str(&format!(
    "              <LongitudeDegrees>{:.8}</LongitudeDegrees>\n",
    point.position().longitude()
  ));
  tcx.push_str("            </Position>\n");

  if let Some(elevation) = point.elevation_meters() {
    tcx.push_str(&format!(
      "            <AltitudeMeters>{}</AltitudeMeters>\n",
      elevation
    ));
  }
  if let Some(heart_rate) = point.heart_rate_bpm() {
    tcx.push_str("            <HeartRateBpm>\n");
    tcx.push_str(&format!("              <Value>{}</Value>\n", heart_rate));
    tcx.push_str("            </HeartRateBpm>\n");
  }
  if let Some(cadence) = point.cadence_rpm() {
    tcx.push_str(&format!("            <Cadence>{}</Cadence>\n", cadence));
  }
  if let Some(temperature) = point.temperature_celsius() {
    tcx.push_str(&format!(
      "            <Temperature>{}</Temperature>\n",
      temperature
    ));
  }

  let watts = point.power().map(|power| match power {
                                  PowerReading::Watts(watts) => watts,
                                  // unlike GPX, the TCX schema wants a
                                  // value, so out of range reads as 0
                                  PowerReading::OutOfRange => 0,
                                });
  if watts.is_some()
     || point.speed_mps().is_some()
     || point.wrist_cadence_rpm().is_some()
  {
    tcx.push_str("            <Extensions>\n");
    tcx.push_str(&format!("              <TPX xmlns=\"{}\">\n", TPX_NS));
    if let Some(speed) = point.speed_mps() {
      tcx.push_str(&format!("                <Speed>{}</Speed>\n",
                            markup::speed(speed)));
    }
    if let Some(watts) = watts {
      tcx.push_str(&format!("                <Watts>{}</Watts>\n", watts));
    }
    if let Some(run_cadence) = point.wrist_cadence_rpm() {
      tcx.push_str(&format!(
        "                <RunCadence>{}</RunCadence>\n",
        run_cadence
      ));
    }
    tcx.push_str("              </TPX>\n");
    tcx.push_str("            </Extensions>\n");
  }

  tcx.push_str("          </Trackpoint>\n");
}


#[cfg(test)]
mod tests {
  use super::{super::{sample::{CalendarTime, DeviceInfo},
                      LogEntry,
                      PeriodicValue,
                      Sample},
              *};
  use pretty_assertions::assert_eq;


  fn test_log(samples: Vec<Sample>) -> LogEntry {
    LogEntry::new(DeviceInfo::new("Ambit".to_string(), "Peak".to_string()),
                  "Running".to_string(),
                  CalendarTime::new(2019, 7, 21, 14, 30, 0),
                  samples)
  }

  fn test_samples() -> Vec<Sample> {
    vec![Sample::GpsBase { latitude:      521_000_000,
                           longitude:     43_000_000,
                           altitude:      1000,
                           utc_base_time: CalendarTime::new(2019, 7, 21, 14,
                                                            30, 0), },
         Sample::Periodic { values:   vec![PeriodicValue::HeartRate(150),
                                           PeriodicValue::Speed(350),
                                           PeriodicValue::BikePower(230),
                                           PeriodicValue::WristCadence(88),
                                           PeriodicValue::Temperature(215),
                                           PeriodicValue::Distance(100)],
                            utc_time: CalendarTime::new(2019, 7, 21, 14, 30,
                                                        10_000), }]
  }

  #[test]
  fn render_test() {
    let tcx = render(&ActivityTrack::from_log(&test_log(test_samples())));

    assert!(tcx.starts_with("<?xml version=\"1.0\"?>\n"));
    assert!(tcx.contains("<Activity Sport=\"Running\">"));
    assert!(tcx.contains("<Id>2019-07-21T14:30:00Z</Id>"));
    assert!(tcx.contains("<Lap StartTime=\"2019-07-21T14:30:00Z\">"));
    assert!(tcx.contains("<TotalTimeSeconds>10</TotalTimeSeconds>"));
    assert!(tcx.contains("<DistanceMeters>100</DistanceMeters>"));
    assert!(tcx.contains("<Intensity>Active</Intensity>"));
    assert!(tcx.contains("<TriggerMethod>Distance</TriggerMethod>"));
    assert!(tcx.contains("<Time>2019-07-21T14:30:10Z</Time>"));
    assert!(tcx.contains("<LatitudeDegrees>52.10000000</LatitudeDegrees>"));
    assert!(tcx.contains("<LongitudeDegrees>4.30000000</LongitudeDegrees>"));
    assert!(tcx.contains("<AltitudeMeters>10</AltitudeMeters>"));
    assert!(tcx.contains("<Value>150</Value>"));
    assert!(tcx.contains("<Temperature>21</Temperature>"));
    assert!(tcx.contains("<Speed>3.5000</Speed>"));
    assert!(tcx.contains("<Watts>230</Watts>"));
    assert!(tcx.contains("<RunCadence>88</RunCadence>"));
    assert!(tcx.contains("<Name>Ambit Peak</Name>"));
  }

  #[test]
  fn render_idempotence_test() {
    let track = ActivityTrack::from_log(&test_log(test_samples()));
    assert_eq!(render(&track), render(&track));
  }

  #[test]
  fn sentinel_rendering_test() {
    let mut samples = test_samples();
    samples.push(Sample::Periodic {
      values:   vec![PeriodicValue::HeartRate(0xff),
                     PeriodicValue::BikePower(0xffff),
                     PeriodicValue::Speed(0xffff)],
      utc_time: CalendarTime::new(2019, 7, 21, 14, 30, 20_000),
    });
    let tcx = render(&ActivityTrack::from_log(&test_log(samples)));

    // sentinels render as 0, never as their raw magnitude
    assert!(!tcx.contains("<Value>255</Value>"));
    assert!(tcx.contains("<Value>0</Value>"));
    assert!(!tcx.contains("<Watts>65535</Watts>"));
    assert!(tcx.contains("<Watts>0</Watts>"));
    assert!(tcx.contains("<Speed>0</Speed>"));
    assert!(!tcx.contains("<Speed>0.0000</Speed>"));
  }

  #[test]
  fn manual_lap_trigger_test() {
    let mut samples = test_samples();
    samples.push(Sample::LapInfo { event_code: 0x01,
                                   distance:   100,
                                   duration:   60_000,
                                   utc_time:   CalendarTime::new(2019, 7,
                                                                 21, 14, 31,
                                                                 0), });
    let tcx = render(&ActivityTrack::from_log(&test_log(samples)));

    assert!(tcx.contains("<TriggerMethod>Manual</TriggerMethod>"));
    assert!(tcx.contains("<Lap StartTime=\"2019-07-21T14:31:00Z\">"));
  }

  #[test]
  fn empty_stream_test() {
    let tcx = render(&ActivityTrack::from_log(&test_log(vec![])));

    // a valid document with one empty lap, not a failure
    assert!(tcx.contains("<Lap StartTime=\"2019-07-21T14:30:00Z\">"));
    assert!(tcx.contains("<TotalTimeSeconds>0</TotalTimeSeconds>"));
    assert!(tcx.contains("<DistanceMeters>0</DistanceMeters>"));
    assert!(!tcx.contains("<Trackpoint>"));
  }
}
