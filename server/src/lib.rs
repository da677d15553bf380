//! Employee directory server: role-filtered lookups over HTTP and GraphQL.

pub mod config;
pub mod directory;
pub mod graphql;
pub mod http;
pub mod principal;
pub mod render;
