pub mod aggregator;
pub mod config;
pub mod server;
pub mod spread;
pub mod trade;

#[cfg(test)]
pub mod mock_data;
