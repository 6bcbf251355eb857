// Domain layer: value types, task rules and the lookup port. No I/O here.

pub mod model;
pub mod ports;
pub mod rules;
