// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod runtime;
mod validation;

pub mod consts;

pub use loader::{
    load_and_validate_config, load_config, ChangeDetection, Config, CyclePolicy, EngineOptions,
    NodeConfig,
};
pub use runtime::{GraphBuilder, PendingConnection};
pub use validation::validate_config;
