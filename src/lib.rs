pub mod api;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod http_client;
pub mod projection;
pub mod provider;
pub mod registry;
pub mod selection;
pub mod state;
pub mod telemetry;
