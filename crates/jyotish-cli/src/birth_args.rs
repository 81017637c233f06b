use clap::Args;
use jyotish_common::Result;
use jyotish_kundali::BirthData;

/// Birth moment and place shared by the chart-fetching subcommands.
#[derive(Debug, Clone, Args)]
pub struct BirthArgs {
    #[arg(long)]
    pub day: u32,
    #[arg(long)]
    pub month: u32,
    #[arg(long)]
    pub year: i32,
    #[arg(long)]
    pub hour: u32,
    #[arg(long)]
    pub minute: u32,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
    /// Hours east of UTC, defaults to 5.5 (IST)
    #[arg(long, allow_negative_numbers = true)]
    pub tzone: Option<f64>,
}

impl BirthArgs {
    pub fn to_birth_data(&self) -> Result<BirthData> {
        BirthData::new(
            self.day,
            self.month,
            self.year,
            self.hour,
            self.minute,
            self.lat,
            self.lon,
            self.tzone,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BirthArgs {
        BirthArgs {
            day: 4,
            month: 7,
            year: 1985,
            hour: 6,
            minute: 5,
            lat: 40.7128,
            lon: -74.0060,
            tzone: Some(-5.0),
        }
    }

    #[test]
    fn converts_with_explicit_timezone() {
        let birth = args().to_birth_data().unwrap();
        assert_eq!(birth.timezone_offset, -5.0);
        assert_eq!(birth.time_label(), "6:05");
    }

    #[test]
    fn missing_timezone_defaults_to_ist() {
        let birth = BirthArgs {
            tzone: None,
            ..args()
        }
        .to_birth_data()
        .unwrap();
        assert_eq!(birth.timezone_offset, 5.5);
    }

    #[test]
    fn invalid_values_are_validation_errors() {
        let err = BirthArgs { hour: 24, ..args() }.to_birth_data().unwrap_err();
        assert!(err.to_string().starts_with("validation error"));
    }
}
