pub mod aggregate;
pub mod birth;
pub mod client;
pub mod facet;
pub mod summary;

pub use aggregate::{AGGREGATED_FACETS, KundaliComposite};
pub use birth::{BirthData, BirthForm, DEFAULT_TIMEZONE_OFFSET, FacetPayload};
pub use client::KundaliClient;
pub use facet::Facet;
pub use summary::{ChartSummary, PlanetSummary};
