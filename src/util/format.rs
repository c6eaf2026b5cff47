// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

/// Formats a media position in seconds into a human-readable `MM:SS` string.
///
/// This is used for the per-card time labels and playback status lines.
/// Positions come straight from the audio engine, so invalid values (NaN,
/// negative, infinite) must render as `00:00` rather than panic or produce
/// garbage.
///
/// # Arguments
///
/// * `seconds` - The position to format, as reported by the engine.
///
/// # Examples
///
/// ```
/// assert_eq!(format_time(65.0), "01:05");
/// assert_eq!(format_time(f64::NAN), "00:00");
/// ```
pub(crate) fn format_time(seconds: f64) -> String {
    if seconds.is_nan() || !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let total = seconds as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(65.0), "01:05");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(3600.0), "60:00");
    }

    #[test]
    fn invalid_input_renders_zero() {
        assert_eq!(format_time(-1.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
        assert_eq!(format_time(f64::NEG_INFINITY), "00:00");
    }
}
