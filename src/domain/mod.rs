// Domain layer: permit models and the portal port. Nothing here talks to the network.

pub mod model;
pub mod ports;
