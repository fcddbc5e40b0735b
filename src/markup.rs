// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Author: Florian Eich <florian@bmc-labs.com>

use chrono::{DateTime, SecondsFormat, Utc};
use eyre::{Result, WrapErr};
use std::{fs, path::Path};


/// Escapes the five XML special characters in text and attribute content.
pub fn escape(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for character in text.chars() {
    match character {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&apos;"),
      other => escaped.push(other),
    }
  }
  escaped
}

/// ISO-8601 timestamp with second precision, e.g. `2019-07-21T14:30:07Z`.
pub fn iso8601(timestamp: DateTime<Utc>) -> String {
  timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// ISO-8601 timestamp with millisecond precision, e.g.
/// `2019-07-21T14:30:07.500Z`.
pub fn iso8601_millis(timestamp: DateTime<Utc>) -> String {
  timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats a speed in m/s at four decimals. Zero is written bare, matching
/// the form the suppressed sentinel reading takes in both document types.
pub fn speed(value: f64) -> String {
  if value == 0.0 {
    "0".to_string()
  } else {
    format!("{:.4}", value)
  }
}

/// Writes rendered document text to a file. Single attempt; the underlying
/// cause is reported on failure, never swallowed.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
  fs::write(path, text).wrap_err_with(|| {
                         format!("could not write '{}'", path.display())
                       })
}


#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use pretty_assertions::assert_eq;


  #[test]
  fn escape_test() {
    assert_eq!("Suunto Ambit3 Peak", escape("Suunto Ambit3 Peak"));
    assert_eq!("Track &amp; Field", escape("Track & Field"));
    assert_eq!("&lt;run&gt; &quot;fast&quot; &apos;pb&apos;",
               escape("<run> \"fast\" 'pb'"));
  }

  #[test]
  fn speed_test() {
    assert_eq!("3.5000", speed(3.5));
    assert_eq!("0.0500", speed(0.05));
    // zero stays bare, without the four decimal tail
    assert_eq!("0", speed(0.0));
  }

  #[test]
  fn iso8601_test() {
    let timestamp = Utc.with_ymd_and_hms(2019, 7, 21, 14, 30, 7).unwrap()
                    + chrono::Duration::milliseconds(500);
    assert_eq!("2019-07-21T14:30:07Z", iso8601(timestamp));
    assert_eq!("2019-07-21T14:30:07.500Z", iso8601_millis(timestamp));
  }

  #[test]
  fn write_text_test() {
    let path = std::env::temp_dir().join("sportlog_write_text_test.txt");
    write_text(&path, "warblgarbl").unwrap();
    assert_eq!("warblgarbl", fs::read_to_string(&path).unwrap());
    fs::remove_file(&path).unwrap();

    let denied = Path::new("/nonexistent-dir/out.gpx");
    assert!(write_text(denied, "warblgarbl").is_err());
  }
}
