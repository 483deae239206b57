// Domain layer: request/payload models and the outbound port.

pub mod model;
pub mod ports;
