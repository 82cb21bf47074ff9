// Domain layer: the ticket record, lotto models and ports (interfaces).

pub mod model;
pub mod ports;
pub mod ticket;
