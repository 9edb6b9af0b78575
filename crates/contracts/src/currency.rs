//! Currency / Rate - decoded domain payload

use std::io::{self, Write};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Exchange-rate history for one currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code, e.g. "EUR"
    pub code: String,

    /// Rates in publication order
    pub rates: Vec<Rate>,
}

/// One published mid rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    /// Publication date
    pub date: NaiveDate,

    /// Mid rate value
    pub value: f64,
}

impl Rate {
    /// Render the one-line textual form consumed by alert outputs
    pub fn render_line(&self) -> String {
        format!("currency rate date={} price={}", self.date, self.value)
    }

    /// Write the one-line textual form, newline-terminated
    pub fn write_line<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.render_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_line_shape() {
        let rate = Rate {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            value: 4.3215,
        };
        assert_eq!(rate.render_line(), "currency rate date=2024-03-01 price=4.3215");
    }

    #[test]
    fn test_write_line_appends_newline() {
        let rate = Rate {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            value: 4.0,
        };
        let mut buf = Vec::new();
        rate.write_line(&mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().ends_with('\n'));
    }
}
