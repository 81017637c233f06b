//! Condensed chart overview.
//!
//! Providers disagree on key names (`sign` vs `rasi`, `name` vs `planet`), so
//! this is the one place that tolerates alternates. Everything else treats the
//! facet payloads as opaque JSON.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::aggregate::KundaliComposite;

const SUMMARY_PLANETS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetSummary {
    pub name: Option<String>,
    pub sign: Option<String>,
    pub house: Option<u64>,
    pub retrograde: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSummary {
    pub ascendant: Option<String>,
    pub current_dasha: Option<String>,
    pub planets: Vec<PlanetSummary>,
}

impl ChartSummary {
    pub fn from_composite(composite: &KundaliComposite) -> Self {
        let planets = composite
            .planets
            .as_ref()
            .and_then(Value::as_array)
            .map(|list| list.iter().take(SUMMARY_PLANETS).map(planet_summary).collect())
            .unwrap_or_default();

        Self {
            ascendant: ascendant_sign(composite),
            current_dasha: current_dasha(composite),
            planets,
        }
    }
}

fn planet_summary(entry: &Value) -> PlanetSummary {
    PlanetSummary {
        name: first_text(entry, &["name", "planet"]),
        sign: first_text(entry, &["sign", "rasi"]),
        house: entry.get("house").and_then(Value::as_u64),
        retrograde: ["is_retrograde", "retro", "isRetro"]
            .iter()
            .any(|key| truthy(entry.get(*key))),
    }
}

fn ascendant_sign(composite: &KundaliComposite) -> Option<String> {
    if let Some(sign) = composite
        .ascendant
        .as_ref()
        .and_then(|a| first_text(a, &["ascending_sign"]))
    {
        return Some(sign);
    }

    composite
        .planets
        .as_ref()
        .and_then(Value::as_array)?
        .iter()
        .find(|p| {
            let name = first_text(p, &["name", "planet"]);
            matches!(name.as_deref(), Some("Ascendant") | Some("Lagna"))
        })
        .and_then(|lagna| first_text(lagna, &["sign", "rasi"]))
}

fn current_dasha(composite: &KundaliComposite) -> Option<String> {
    composite
        .current_dasha
        .as_ref()
        .and_then(|d| first_text(d, &["major_dasha", "current_mahadasha"]))
}

/// First non-empty value among `keys`, rendered as text.
fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // Some dasha payloads nest the planet: {"major_dasha": {"planet": "Venus"}}
        Value::Object(obj) => obj
            .get("planet")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    }
}

impl fmt::Display for ChartSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lagna:     {}", self.ascendant.as_deref().unwrap_or("unknown"))?;
        writeln!(f, "Mahadasha: {}", self.current_dasha.as_deref().unwrap_or("unknown"))?;
        if self.planets.is_empty() {
            return writeln!(f, "Planets:   unavailable");
        }
        writeln!(f, "Planets:")?;
        for planet in &self.planets {
            write!(
                f,
                "  {:<10} {}",
                planet.name.as_deref().unwrap_or("?"),
                planet.sign.as_deref().unwrap_or("?")
            )?;
            if let Some(house) = planet.house {
                write!(f, " (H{house})")?;
            }
            if planet.retrograde {
                write!(f, " ℞")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_primary_and_alternate_planet_keys() {
        let composite = KundaliComposite {
            planets: Some(json!([
                {"name": "Sun", "sign": "Leo", "house": 10, "is_retrograde": false},
                {"planet": "Saturn", "rasi": "Makara", "retro": "true"},
            ])),
            ..Default::default()
        };

        let summary = ChartSummary::from_composite(&composite);
        assert_eq!(
            summary.planets,
            vec![
                PlanetSummary {
                    name: Some("Sun".into()),
                    sign: Some("Leo".into()),
                    house: Some(10),
                    retrograde: false,
                },
                PlanetSummary {
                    name: Some("Saturn".into()),
                    sign: Some("Makara".into()),
                    house: None,
                    retrograde: true,
                },
            ]
        );
    }

    #[test]
    fn keeps_only_first_six_planets() {
        let planets: Vec<Value> = (0..9).map(|i| json!({"name": format!("P{i}")})).collect();
        let composite = KundaliComposite {
            planets: Some(Value::Array(planets)),
            ..Default::default()
        };
        assert_eq!(ChartSummary::from_composite(&composite).planets.len(), 6);
    }

    #[test]
    fn ascendant_prefers_report_then_lagna_entry() {
        let mut composite = KundaliComposite {
            planets: Some(json!([{"name": "Ascendant", "sign": "Scorpio"}])),
            ascendant: Some(json!({"ascending_sign": "Vrishchika"})),
            ..Default::default()
        };
        assert_eq!(
            ChartSummary::from_composite(&composite).ascendant.as_deref(),
            Some("Vrishchika")
        );

        composite.ascendant = None;
        assert_eq!(
            ChartSummary::from_composite(&composite).ascendant.as_deref(),
            Some("Scorpio")
        );
    }

    #[test]
    fn current_dasha_falls_back_to_current_mahadasha() {
        let composite = KundaliComposite {
            current_dasha: Some(json!({"current_mahadasha": "Rahu"})),
            ..Default::default()
        };
        assert_eq!(
            ChartSummary::from_composite(&composite).current_dasha.as_deref(),
            Some("Rahu")
        );
    }

    #[test]
    fn empty_composite_renders_placeholders() {
        let rendered = ChartSummary::from_composite(&KundaliComposite::default()).to_string();
        assert!(rendered.contains("Lagna:     unknown"));
        assert!(rendered.contains("Planets:   unavailable"));
    }
}
