// Domain layer: post model, scrape state and ports. No I/O here.

pub mod model;
pub mod ports;
