pub mod ingest;
pub mod order_service;
