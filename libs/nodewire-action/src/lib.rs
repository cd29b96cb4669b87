//! Cluster actions: named request/response record pairs.

pub mod action;
pub mod error;
pub mod nodes_info;
pub mod rebuild;

pub use action::{catalog, register_action, ActionInfo, ActionRegistry, ClusterAction};
pub use error::ActionError;
pub use nodes_info::{NodesInfoAction, NodesInfoRequest, NodesInfoResponse};
pub use rebuild::{IndicesOptions, RebuildAction, RebuildRequest, RebuildResponse, ShardFailure};
