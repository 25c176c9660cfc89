//! Base-60 angle notation for region coordinates.
//!
//! Right ascension is written in hours (`H:MM:SS.sss`), declination in
//! degrees (`D:MM:SS.sss`). The leading field is not zero-padded and only
//! negative angles carry a sign. Seconds are rounded to milliseconds with
//! carries propagated, so 59.9996 s becomes the next whole minute.

/// Decimal degrees of right ascension as colon-separated hours.
pub fn degrees_to_hms(degrees: f64) -> String {
    sexagesimal(degrees / 15.0)
}

/// Decimal degrees of declination as colon-separated degrees.
pub fn degrees_to_dms(degrees: f64) -> String {
    sexagesimal(degrees)
}

fn sexagesimal(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let millis = (value.abs() * 3_600_000.0).round() as u64;

    let whole = millis / 3_600_000;
    let minutes = millis / 60_000 % 60;
    let seconds = millis / 1000 % 60;
    let frac = millis % 1000;

    // -0.0001 rounds to zero; don't print "-0:00:00.000".
    let sign = if millis == 0 { "" } else { sign };
    format!("{sign}{whole}:{minutes:02}:{seconds:02}.{frac:03}")
}
