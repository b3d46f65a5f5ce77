// Domain layer: reservation models and ports. No HTTP or config code here.

pub mod model;
pub mod ports;
