// Adapters layer: concrete implementations of the domain ports (console output, site files).

pub mod console;
pub mod storage;
