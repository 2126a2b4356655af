pub mod ingest;
pub mod runner;
