use std::collections::BTreeMap;

use nodewire_api::{Registry, RegistryBuilder, RegistryError, VersionedRecord};

use crate::error::ActionError;
use crate::nodes_info::NodesInfoAction;
use crate::rebuild::RebuildAction;

/// A named request/response pair exchanged between cluster members.
///
/// Both halves are versioned records, so they negotiate their layout like
/// any other envelope.
pub trait ClusterAction {
    const NAME: &'static str;
    type Request: VersionedRecord;
    type Response: VersionedRecord;

    fn new_response() -> Self::Response {
        Self::Response::default()
    }
}

/// Register the request and response types of `A`.
pub fn register_action<A: ClusterAction>(builder: RegistryBuilder) -> Result<RegistryBuilder, RegistryError> {
    builder
        .register::<A::Request>()?
        .register::<A::Response>()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionInfo {
    pub name: &'static str,
    pub request_type: &'static str,
    pub response_type: &'static str,
}

// ════════════════════════════════════════════════════════════════
//  ActionRegistry
// ════════════════════════════════════════════════════════════════

/// Action name → record types it travels as.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, ActionInfo>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A: ClusterAction>(&mut self) -> Result<&ActionInfo, ActionError> {
        if self.actions.contains_key(A::NAME) {
            return Err(ActionError::DuplicateAction(A::NAME));
        }
        let info = ActionInfo {
            name: A::NAME,
            request_type: A::Request::RECORD_TYPE,
            response_type: A::Response::RECORD_TYPE,
        };
        tracing::debug!(
            action = info.name,
            request = info.request_type,
            response = info.response_type,
            "action registered"
        );
        Ok(self.actions.entry(A::NAME).or_insert(info))
    }

    pub fn get(&self, name: &str) -> Result<&ActionInfo, ActionError> {
        self.actions
            .get(name)
            .ok_or_else(|| ActionError::UnknownAction(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Codec registry with the node family and every built-in action, plus the
/// matching action table.
pub fn catalog() -> Result<(Registry, ActionRegistry), ActionError> {
    let builder = Registry::builder(nodewire_node::KNOWN_VERSIONS);
    let builder = nodewire_node::register(builder)?;
    let builder = register_action::<NodesInfoAction>(builder)?;
    let builder = register_action::<RebuildAction>(builder)?;

    let mut actions = ActionRegistry::new();
    actions.register::<NodesInfoAction>()?;
    actions.register::<RebuildAction>()?;

    Ok((builder.build(), actions))
}
