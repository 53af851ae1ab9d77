// Application layer: exporters and the pipeline wiring fetcher, driver and storage.

pub mod exporters;
pub mod pipelines;
