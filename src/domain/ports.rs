use crate::domain::model::{Ack, Temperature};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read/write access to per-city temperatures. Both operations are total.
pub trait TemperatureStore: Send + Sync {
    fn get_temperature(&self, city: &str) -> Temperature;
    fn set_temperature(&self, city: &str, temp: Temperature) -> Ack;
}

/// Framed message channel the server reads requests from and writes responses to.
#[async_trait]
pub trait Transport: Send {
    /// Next frame as raw bytes, or `None` once the peer has closed the stream.
    /// Frames are not guaranteed to be valid UTF-8.
    async fn recv(&mut self) -> Result<Option<Vec<u8>>>;
    async fn send(&mut self, frame: &str) -> Result<()>;
}
