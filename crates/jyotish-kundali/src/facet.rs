use std::fmt;
use std::str::FromStr;

use jyotish_common::Error;

/// One independently fetched category of chart data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Planets,
    /// Rasi (D1) chart layout. Not part of the composite.
    BirthChart,
    HouseCusps,
    Mahadasha,
    CurrentMahadashaFull,
    YogaList,
    AscendantReport,
}

impl Facet {
    pub const ALL: [Facet; 7] = [
        Facet::Planets,
        Facet::BirthChart,
        Facet::HouseCusps,
        Facet::Mahadasha,
        Facet::CurrentMahadashaFull,
        Facet::YogaList,
        Facet::AscendantReport,
    ];

    /// Endpoint path relative to the provider base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Facet::Planets => "planets",
            Facet::BirthChart => "horo_chart/D1",
            Facet::HouseCusps => "house_cusps",
            Facet::Mahadasha => "dashas/mahadasha",
            Facet::CurrentMahadashaFull => "dashas/current_mahadasha_full",
            Facet::YogaList => "yoga_list",
            Facet::AscendantReport => "ascendant_report",
        }
    }

    /// Short kebab-case name, used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Facet::Planets => "planets",
            Facet::BirthChart => "birth-chart",
            Facet::HouseCusps => "houses",
            Facet::Mahadasha => "mahadasha",
            Facet::CurrentMahadashaFull => "current-dasha",
            Facet::YogaList => "yogas",
            Facet::AscendantReport => "ascendant",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Facet {
    type Err = Error;

    /// Accepts either the short name or the endpoint path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Facet::ALL
            .into_iter()
            .find(|f| f.name() == wanted || f.path() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Facet::ALL.iter().map(|f| f.name()).collect();
                Error::Validation(format!(
                    "unknown facet '{wanted}', expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_match_provider_endpoints() {
        let paths: Vec<&str> = Facet::ALL.iter().map(|f| f.path()).collect();
        assert_eq!(
            paths,
            vec![
                "planets",
                "horo_chart/D1",
                "house_cusps",
                "dashas/mahadasha",
                "dashas/current_mahadasha_full",
                "yoga_list",
                "ascendant_report",
            ]
        );
    }

    #[test]
    fn parses_names_and_paths() {
        assert_eq!("yogas".parse::<Facet>().unwrap(), Facet::YogaList);
        assert_eq!("horo_chart/D1".parse::<Facet>().unwrap(), Facet::BirthChart);
        assert_eq!(" current-dasha ".parse::<Facet>().unwrap(), Facet::CurrentMahadashaFull);
    }

    #[test]
    fn unknown_facet_lists_choices() {
        let err = "navamsa".parse::<Facet>().unwrap_err();
        assert!(err.to_string().contains("birth-chart"));
    }
}
