pub mod registry;
pub mod server;
pub mod tools;

pub use crate::domain::model::{Ack, CityKey, Temperature};
pub use crate::domain::ports::{TemperatureStore, Transport};
pub use crate::utils::error::Result;
