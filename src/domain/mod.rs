// Domain layer: core models and ports (interfaces). No HTTP or HTML types leak through here.

pub mod model;
pub mod ports;
