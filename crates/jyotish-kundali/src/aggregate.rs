use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::birth::BirthData;
use crate::client::KundaliClient;
use crate::facet::Facet;

/// Facets gathered for the chat context, in composite field order.
pub const AGGREGATED_FACETS: [Facet; 6] = [
    Facet::Planets,
    Facet::HouseCusps,
    Facet::CurrentMahadashaFull,
    Facet::Mahadasha,
    Facet::YogaList,
    Facet::AscendantReport,
];

/// Best-effort chart: each facet payload, or `None` if that call failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KundaliComposite {
    #[serde(default)]
    pub planets: Option<Value>,
    #[serde(default)]
    pub houses: Option<Value>,
    #[serde(default)]
    pub current_dasha: Option<Value>,
    #[serde(default)]
    pub mahadasha: Option<Value>,
    #[serde(default)]
    pub yogas: Option<Value>,
    #[serde(default)]
    pub ascendant: Option<Value>,
}

impl KundaliComposite {
    /// A chart is only worth chatting about if the planets list came back.
    pub fn is_usable(&self) -> bool {
        matches!(self.planets, Some(Value::Array(_)))
    }

    pub fn get(&self, facet: Facet) -> Option<&Value> {
        self.slot(facet).and_then(|slot| slot.as_ref())
    }

    /// Aggregated facets whose payload is absent.
    pub fn missing_facets(&self) -> Vec<Facet> {
        AGGREGATED_FACETS
            .into_iter()
            .filter(|facet| self.get(*facet).is_none())
            .collect()
    }

    fn slot(&self, facet: Facet) -> Option<&Option<Value>> {
        match facet {
            Facet::Planets => Some(&self.planets),
            Facet::HouseCusps => Some(&self.houses),
            Facet::CurrentMahadashaFull => Some(&self.current_dasha),
            Facet::Mahadasha => Some(&self.mahadasha),
            Facet::YogaList => Some(&self.yogas),
            Facet::AscendantReport => Some(&self.ascendant),
            Facet::BirthChart => None,
        }
    }

    fn set(&mut self, facet: Facet, value: Option<Value>) {
        let slot = match facet {
            Facet::Planets => &mut self.planets,
            Facet::HouseCusps => &mut self.houses,
            Facet::CurrentMahadashaFull => &mut self.current_dasha,
            Facet::Mahadasha => &mut self.mahadasha,
            Facet::YogaList => &mut self.yogas,
            Facet::AscendantReport => &mut self.ascendant,
            Facet::BirthChart => return,
        };
        *slot = value;
    }
}

impl KundaliClient {
    /// Fetch all six composite facets concurrently and wait for every one of
    /// them. A failed facet is logged and left as `None`; this never fails.
    #[instrument(skip_all, fields(date = %birth.date_label(), time = %birth.time_label()))]
    pub async fn fetch_all_facets(&self, birth: &BirthData) -> KundaliComposite {
        let calls = AGGREGATED_FACETS.into_iter().map(|facet| async move {
            let outcome = self.fetch_facet(facet, birth).await;
            (facet, outcome)
        });

        let mut composite = KundaliComposite::default();
        for (facet, outcome) in join_all(calls).await {
            let value = match outcome {
                Ok(payload) => Some(payload),
                Err(e) => {
                    warn!("facet {} failed, continuing without it: {}", facet, e);
                    None
                }
            };
            composite.set(facet, value);
        }

        let missing = composite.missing_facets();
        if missing.is_empty() {
            info!("fetched all {} kundali facets", AGGREGATED_FACETS.len());
        } else {
            let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
            info!(
                "fetched {}/{} kundali facets (missing: {})",
                AGGREGATED_FACETS.len() - missing.len(),
                AGGREGATED_FACETS.len(),
                names.join(", ")
            );
        }

        composite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn usable_only_with_planet_list() {
        let mut composite = KundaliComposite::default();
        assert!(!composite.is_usable());

        composite.planets = Some(json!({"error": "bad credentials"}));
        assert!(!composite.is_usable());

        composite.planets = Some(json!([{"name": "Sun"}]));
        assert!(composite.is_usable());
    }

    #[test]
    fn serializes_absent_facets_as_null_with_camel_case_keys() {
        let composite = KundaliComposite {
            planets: Some(json!([])),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&composite).unwrap(),
            json!({
                "planets": [],
                "houses": null,
                "currentDasha": null,
                "mahadasha": null,
                "yogas": null,
                "ascendant": null,
            })
        );
    }

    #[test]
    fn deserializes_partial_context() {
        let composite: KundaliComposite =
            serde_json::from_value(json!({"planets": [], "currentDasha": {"major_dasha": "Venus"}}))
                .unwrap();

        assert!(composite.is_usable());
        assert_eq!(
            composite.missing_facets(),
            vec![
                Facet::HouseCusps,
                Facet::Mahadasha,
                Facet::YogaList,
                Facet::AscendantReport
            ]
        );
    }

    #[test]
    fn birth_chart_has_no_composite_slot() {
        let mut composite = KundaliComposite::default();
        composite.set(Facet::BirthChart, Some(json!({})));
        assert_eq!(composite, KundaliComposite::default());
        assert!(composite.get(Facet::BirthChart).is_none());
    }
}
