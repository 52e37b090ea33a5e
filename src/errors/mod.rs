// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod connector;
mod graph;
mod loader;

pub use config::ValidationError;
pub use connector::ConnectorError;
pub use graph::GraphError;
pub use loader::ConfigError;
