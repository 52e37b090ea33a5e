// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod node;
mod schema;
mod value;

pub use node::{
    ConnectionState, DataSourceNode, DeliveryCursor, Edge, EdgeId, Node, NodeId, NodeKind,
    NodePayload, NodeSpec, NodeUpdate, TableNode, TransformNode,
};
pub use schema::{Column, ColumnType, Schema};
pub use value::{field, row, scalar_text, Dataset, Row, Scalar};
