// Domain layer: core models and ports (interfaces) shared by the page logger and the server.

pub mod model;
pub mod ports;
