pub mod api;
pub mod config_service;
pub mod dto;
pub mod gateway;
pub mod paths;

#[cfg(test)]
mod test_support;

pub use crate::api::ApiClient;
pub use crate::config_service::ConfigService;
pub use crate::gateway::HttpWidgetGateway;
pub use crate::paths::DeskPaths;
