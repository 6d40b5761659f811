// Domain layer: registry key/value types and the ports the hosting layer plugs into.

pub mod model;
pub mod ports;
