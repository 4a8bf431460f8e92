// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Wire format: one ASCII decimal per line, four fractional digits, CR LF.

use std::fmt::Write;

pub const LINE_TERMINATOR: &str = "\r\n";
pub const FRACTION_DIGITS: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LineError {
    #[error("line is not terminated by CR LF")]
    MissingTerminator,
    #[error("expected 4 fractional digits, found {0}")]
    BadPrecision(usize),
    #[error("invalid numeric payload '{0}'")]
    InvalidNumber(String),
}

/// Reusable text buffer holding the current sample line.
#[derive(Debug, Default, Clone)]
pub struct SampleLine {
    text: String,
}

impl SampleLine {
    pub fn new() -> Self {
        Self {
            text: String::with_capacity(32),
        }
    }

    pub fn format(value: f64) -> Self {
        let mut line = Self::new();
        line.set(value);
        line
    }

    /// Replaces the buffer contents with `value`, keeping the allocation.
    pub fn set(&mut self, value: f64) {
        self.text.clear();
        // Writing into a String cannot fail.
        let _ = write!(
            self.text,
            "{:.*}{}",
            FRACTION_DIGITS,
            value,
            LINE_TERMINATOR
        );
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// The line without its terminator, for console echo.
    pub fn value_str(&self) -> &str {
        self.text.trim_end_matches(LINE_TERMINATOR)
    }
}

impl std::fmt::Display for SampleLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value_str())
    }
}

/// Parses one wire line back into its value.
pub fn parse_line(line: &str) -> Result<f64, LineError> {
    let payload = line
        .strip_suffix(LINE_TERMINATOR)
        .ok_or(LineError::MissingTerminator)?;

    let fraction = payload.split_once('.').map(|(_, frac)| frac).unwrap_or("");
    if fraction.len() != FRACTION_DIGITS || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LineError::BadPrecision(fraction.len()));
    }

    payload
        .parse::<f64>()
        .map_err(|_| LineError::InvalidNumber(payload.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_offset_value() {
        assert_eq!(SampleLine::format(4.0).as_str(), "4.0000\r\n");
    }

    #[test]
    fn test_format_rounds_to_four_places() {
        assert_eq!(SampleLine::format(7.999_99).as_str(), "8.0000\r\n");
        assert_eq!(SampleLine::format(0.123_44).as_str(), "0.1234\r\n");
        assert_eq!(SampleLine::format(-1.5).as_str(), "-1.5000\r\n");
    }

    #[test]
    fn test_set_reuses_buffer() {
        let mut line = SampleLine::format(1.0);
        line.set(2.25);
        assert_eq!(line.as_bytes(), b"2.2500\r\n");
        assert_eq!(line.value_str(), "2.2500");
        assert_eq!(line.to_string(), "2.2500");
    }

    #[test]
    fn test_parse_accepts_wire_lines() {
        assert_eq!(parse_line("4.0000\r\n"), Ok(4.0));
        assert_eq!(parse_line("-0.2500\r\n"), Ok(-0.25));
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert_eq!(parse_line("4.0000\n"), Err(LineError::MissingTerminator));
        assert_eq!(parse_line("4.00\r\n"), Err(LineError::BadPrecision(2)));
        assert_eq!(parse_line("4\r\n"), Err(LineError::BadPrecision(0)));
        assert_eq!(
            parse_line("x.0000\r\n"),
            Err(LineError::InvalidNumber("x.0000".to_string()))
        );
    }
}
