pub mod client;
pub mod http_parser;
pub mod rate_limit;
pub mod rest_request;
