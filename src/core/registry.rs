//! In-memory temperature registry.
//!
//! Holds the latest recorded temperature per [`CityKey`]. Lookups for cities
//! with nothing recorded return a synthetic reading that is never stored.

use crate::domain::model::{Ack, CityKey, Temperature};
use crate::domain::ports::TemperatureStore;
use parking_lot::RwLock;
use rand::Rng;
use std::collections::HashMap;

/// Closed range synthetic readings are drawn from.
pub const FALLBACK_MIN: Temperature = -5.0;
pub const FALLBACK_MAX: Temperature = 35.0;

pub const DEFAULT_SEEDS: [(&str, Temperature); 1] = [("berlin", 20.0)];

#[derive(Debug)]
pub struct WeatherRegistry {
    entries: RwLock<HashMap<CityKey, Temperature>>,
}

impl WeatherRegistry {
    /// Empty registry; every lookup falls back until something is written.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_seeds<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = (S, Temperature)>,
        S: AsRef<str>,
    {
        let entries = seeds
            .into_iter()
            .map(|(city, temp)| (CityKey::normalize(city.as_ref()), temp))
            .collect();

        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn get_temperature(&self, city: &str) -> Temperature {
        let key = CityKey::normalize(city);

        if let Some(temp) = self.entries.read().get(&key).copied() {
            return temp;
        }

        let temp = synthetic_temperature(&mut rand::rng());
        tracing::trace!(city = %key, temp, "no recorded temperature, using fallback");
        temp
    }

    pub fn set_temperature(&self, city: &str, temp: Temperature) -> Ack {
        let key = CityKey::normalize(city);
        tracing::debug!(city = %key, temp, "recording temperature");
        self.entries.write().insert(key, temp);
        Ack
    }

    /// Recorded value only, without the synthetic fallback.
    pub fn recorded(&self, city: &str) -> Option<Temperature> {
        self.entries.read().get(&CityKey::normalize(city)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for WeatherRegistry {
    fn default() -> Self {
        Self::with_seeds(DEFAULT_SEEDS)
    }
}

impl TemperatureStore for WeatherRegistry {
    fn get_temperature(&self, city: &str) -> Temperature {
        WeatherRegistry::get_temperature(self, city)
    }

    fn set_temperature(&self, city: &str, temp: Temperature) -> Ack {
        WeatherRegistry::set_temperature(self, city, temp)
    }
}

/// Uniform draw from [FALLBACK_MIN, FALLBACK_MAX], rounded to one decimal.
pub fn synthetic_temperature<R: Rng + ?Sized>(rng: &mut R) -> Temperature {
    let raw = rng.random_range(FALLBACK_MIN..=FALLBACK_MAX);
    (raw * 10.0).round() / 10.0
}
