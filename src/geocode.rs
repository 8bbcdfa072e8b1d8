// City name -> coordinate lookup used when the table carries no coordinates
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

const KNOWN_CITIES: [(&str, f64, f64); 10] = [
    ("Delhi", 28.6139, 77.2090),
    ("Mumbai", 19.0760, 72.8777),
    ("Bangalore", 12.9716, 77.5946),
    ("Chennai", 13.0827, 80.2707),
    ("Hyderabad", 17.3850, 78.4867),
    ("Pune", 18.5204, 73.8567),
    ("Kolkata", 22.5726, 88.3639),
    ("Jaipur", 26.9124, 75.7873),
    ("Ahmedabad", 23.0225, 72.5714),
    ("Lucknow", 26.8467, 80.9462),
];

/// Exact-match (case-sensitive) lookup table of city coordinates.
#[derive(Debug, Clone)]
pub struct CityCoordinates {
    cities: HashMap<String, Coordinate>,
}

impl Default for CityCoordinates {
    fn default() -> Self {
        let mut coords = Self::empty();
        for (city, latitude, longitude) in KNOWN_CITIES {
            coords.insert(city, latitude, longitude);
        }
        coords
    }
}

impl CityCoordinates {
    pub fn empty() -> Self {
        Self {
            cities: HashMap::new(),
        }
    }

    /// Built-in cities plus `extra`, where `extra` wins on conflicts.
    pub fn with_overrides<'a>(extra: impl IntoIterator<Item = (&'a String, &'a (f64, f64))>) -> Self {
        let mut coords = Self::default();
        for (city, &(latitude, longitude)) in extra {
            coords.insert(city, latitude, longitude);
        }
        coords
    }

    pub fn insert(&mut self, city: &str, latitude: f64, longitude: f64) {
        self.cities.insert(
            city.to_string(),
            Coordinate {
                latitude,
                longitude,
            },
        );
    }

    pub fn lookup(&self, city: &str) -> Option<Coordinate> {
        self.cities.get(city).copied()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
