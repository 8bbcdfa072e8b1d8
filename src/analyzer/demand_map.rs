use crate::analyzer::Analyzer;
use crate::geocode::{CityCoordinates, Coordinate};
use crate::model::{AnalysisError, CityDemandPoint, Table};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Sums demand per located city for map rendering.
///
/// Coordinates come from the `latitude`/`longitude` columns when both exist, otherwise
/// from the city lookup. Cities the lookup does not know are dropped silently.
#[derive(Debug, Clone)]
pub struct DemandMapAnalyzer {
    coordinates: Arc<CityCoordinates>,
}

impl Default for DemandMapAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(CityCoordinates::default()))
    }
}

impl DemandMapAnalyzer {
    pub const REQUIRED: &'static [&'static str] = &["city", "demand"];

    pub fn new(coordinates: Arc<CityCoordinates>) -> Self {
        Self { coordinates }
    }

    fn coordinate_at(
        &self,
        table: &Table,
        row: usize,
        city: &str,
        columns: Option<(usize, usize)>,
    ) -> Result<Option<Coordinate>, AnalysisError> {
        match columns {
            Some((lat, lon)) => {
                let (Some(latitude), Some(longitude)) = (table.number(row, lat)?, table.number(row, lon)?)
                else {
                    return Ok(None);
                };
                Ok(Some(Coordinate {
                    latitude,
                    longitude,
                }))
            }
            None => Ok(self.coordinates.lookup(city)),
        }
    }
}

impl Analyzer for DemandMapAnalyzer {
    type Output = Vec<CityDemandPoint>;

    fn name(&self) -> &'static str {
        "demand_map"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        Self::REQUIRED
    }

    fn analyze(&self, table: &Table) -> Result<Self::Output, AnalysisError> {
        let city_col = table.require("city")?;
        let demand_col = table.require("demand")?;
        let coord_cols = table
            .column_index("latitude")
            .zip(table.column_index("longitude"));

        let mut index: HashMap<(String, u64, u64), usize> = HashMap::new();
        let mut points: Vec<CityDemandPoint> = Vec::new();
        let mut dropped = 0usize;

        for row in 0..table.len() {
            let Some(city) = table.label(row, city_col) else {
                dropped += 1;
                continue;
            };
            let Some(demand) = table.number(row, demand_col)? else {
                dropped += 1;
                continue;
            };
            let Some(coord) = self.coordinate_at(table, row, &city, coord_cols)? else {
                dropped += 1;
                continue;
            };

            // +0.0 folds -0.0 into 0.0 so both land in the same group
            let key = (
                city.clone(),
                (coord.latitude + 0.0).to_bits(),
                (coord.longitude + 0.0).to_bits(),
            );
            let slot = *index.entry(key).or_insert_with(|| {
                points.push(CityDemandPoint {
                    city,
                    latitude: coord.latitude,
                    longitude: coord.longitude,
                    demand_total: 0.0,
                });
                points.len() - 1
            });
            points[slot].demand_total += demand;
        }

        if dropped > 0 {
            debug!("Dropped {} rows without city, demand or coordinates", dropped);
        }
        Ok(points)
    }
}
