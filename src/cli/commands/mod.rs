//! CLI command implementations

pub mod completions;
pub mod get_local_env;
pub mod metadata;
pub mod push_tunnel_app;
pub mod start_tunnel;
