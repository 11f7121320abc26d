pub mod api;
pub mod auth_middleware;
pub mod channels;
pub mod config;
pub mod context;
pub mod correlation;
pub mod grammar;
pub mod inbox;
pub mod metrics;
pub mod model;
pub mod normalizer;
pub mod notification;
pub mod rate_limiter;
pub mod relay;
pub mod transport;
