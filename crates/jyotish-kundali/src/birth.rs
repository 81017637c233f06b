use jyotish_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Indian Standard Time, used when the caller does not send an offset.
pub const DEFAULT_TIMEZONE_OFFSET: f64 = 5.5;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

const MISSING_FIELDS: &str = "Missing required birth data fields";

/// Validated birth moment and place. Every facet request is built from this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthData {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub hour: u32,
    pub minute: u32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: f64,
}

fn default_timezone_offset() -> f64 {
    DEFAULT_TIMEZONE_OFFSET
}

impl BirthData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        day: u32,
        month: u32,
        year: i32,
        hour: u32,
        minute: u32,
        latitude: f64,
        longitude: f64,
        timezone_offset: Option<f64>,
    ) -> Result<Self> {
        let birth = Self {
            day,
            month,
            year,
            hour,
            minute,
            latitude,
            longitude,
            timezone_offset: timezone_offset.unwrap_or(DEFAULT_TIMEZONE_OFFSET),
        };
        birth.validate()?;
        Ok(birth)
    }

    fn validate(&self) -> Result<()> {
        check_range("day", self.day, 1..=31)?;
        check_range("month", self.month, 1..=12)?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(Error::Validation(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}, got {}",
                self.year
            )));
        }
        check_range("hour", self.hour, 0..=23)?;
        check_range("minute", self.minute, 0..=59)?;
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::Validation(format!(
                "latitude must be between -90 and 90, got {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::Validation(format!(
                "longitude must be between -180 and 180, got {}",
                self.longitude
            )));
        }
        if !(-14.0..=14.0).contains(&self.timezone_offset) {
            return Err(Error::Validation(format!(
                "timezone offset must be between -14 and 14, got {}",
                self.timezone_offset
            )));
        }
        Ok(())
    }

    /// Provider-facing request body for this birth moment.
    pub fn payload(&self) -> FacetPayload {
        FacetPayload::from(self)
    }

    /// `d/m/y`, as shown back to the user.
    pub fn date_label(&self) -> String {
        format!("{}/{}/{}", self.day, self.month, self.year)
    }

    /// `h:mm`; only the minute is zero-padded.
    pub fn time_label(&self) -> String {
        format!("{}:{:02}", self.hour, self.minute)
    }
}

fn check_range(field: &str, value: u32, range: std::ops::RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{field} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        )))
    }
}

/// JSON body sent to every facet endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacetPayload {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub hour: u32,
    pub min: u32,
    pub lat: f64,
    pub lon: f64,
    pub tzone: f64,
}

impl From<&BirthData> for FacetPayload {
    fn from(birth: &BirthData) -> Self {
        Self {
            day: birth.day,
            month: birth.month,
            year: birth.year,
            hour: birth.hour,
            min: birth.minute,
            lat: birth.latitude,
            lon: birth.longitude,
            tzone: birth.timezone_offset,
        }
    }
}

/// A form field that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FormValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FormValue {
    fn as_f64(&self, field: &str) -> Result<Option<f64>> {
        let not_numeric = || Error::Validation(format!("{field} must be numeric, got '{self}'"));
        let value = match self {
            FormValue::Int(v) => *v as f64,
            FormValue::Float(v) => *v,
            FormValue::Text(s) if s.trim().is_empty() => return Ok(None),
            FormValue::Text(s) => s.trim().parse::<f64>().map_err(|_| not_numeric())?,
        };
        // "NaN" and "inf" parse as f64 but are not birth data.
        if !value.is_finite() {
            return Err(not_numeric());
        }
        Ok(Some(value))
    }
}

impl std::fmt::Display for FormValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormValue::Int(v) => write!(f, "{v}"),
            FormValue::Float(v) => write!(f, "{v}"),
            FormValue::Text(s) => f.write_str(s),
        }
    }
}

/// Raw birth form as posted by a browser or API client.
///
/// Accepts both the short provider names (`lat`, `lon`, `tzone`) and the long
/// names (`latitude`, `longitude`, `timezoneOffset`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BirthForm {
    #[serde(default)]
    day: Option<FormValue>,
    #[serde(default)]
    month: Option<FormValue>,
    #[serde(default)]
    year: Option<FormValue>,
    #[serde(default)]
    hour: Option<FormValue>,
    #[serde(default, alias = "min")]
    minute: Option<FormValue>,
    #[serde(default, alias = "latitude")]
    lat: Option<FormValue>,
    #[serde(default, alias = "longitude")]
    lon: Option<FormValue>,
    #[serde(default, alias = "timezoneOffset", alias = "timezone_offset")]
    tzone: Option<FormValue>,
}

impl BirthForm {
    /// Parse and validate the form. Absent required fields produce a single
    /// "missing fields" error; integers are truncated like a form parser would.
    pub fn into_birth_data(self) -> Result<BirthData> {
        let day = required(&self.day, "day")?;
        let month = required(&self.month, "month")?;
        let year = required(&self.year, "year")?;
        let hour = required(&self.hour, "hour")?;
        let minute = required(&self.minute, "minute")?;
        let lat = required(&self.lat, "lat")?;
        let lon = required(&self.lon, "lon")?;
        let tzone = match &self.tzone {
            Some(value) => value.as_f64("tzone")?,
            None => None,
        };

        BirthData::new(
            to_unsigned("day", day)?,
            to_unsigned("month", month)?,
            year.trunc() as i32,
            to_unsigned("hour", hour)?,
            to_unsigned("minute", minute)?,
            lat,
            lon,
            tzone,
        )
    }
}

fn required(value: &Option<FormValue>, field: &str) -> Result<f64> {
    match value {
        Some(v) => v
            .as_f64(field)?
            .ok_or_else(|| Error::Validation(MISSING_FIELDS.to_string())),
        None => Err(Error::Validation(MISSING_FIELDS.to_string())),
    }
}

fn to_unsigned(field: &str, value: f64) -> Result<u32> {
    let truncated = value.trunc();
    if truncated < 0.0 || truncated > u32::MAX as f64 {
        return Err(Error::Validation(format!("{field} out of range: {value}")));
    }
    Ok(truncated as u32)
}
