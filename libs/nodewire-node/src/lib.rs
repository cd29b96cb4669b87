//! Node-information record family and its protocol version table.
//!
//! Versioned records ([`NodeInfo`], [`Build`], [`OsInfo`],
//! [`PluginsAndModules`]) are registered with [`registry`]; the remaining
//! types are version-independent wire values nested inside them.

pub mod build;
pub mod discovery;
pub mod monitor;
pub mod node_info;
pub mod os;
pub mod plugins;
pub mod render;
pub mod settings;
pub mod thread_pool;
pub mod transport;
pub mod versions;

use nodewire_api::{Registry, RegistryBuilder, RegistryError};

pub use build::Build;
pub use discovery::DiscoveryNode;
pub use monitor::{JvmInfo, ProcessInfo};
pub use node_info::NodeInfo;
pub use os::OsInfo;
pub use plugins::{PluginInfo, PluginsAndModules};
pub use render::render_json;
pub use settings::Settings;
pub use thread_pool::{ThreadPoolEntry, ThreadPoolInfo};
pub use transport::{BoundTransportAddress, HttpInfo, TransportAddress, TransportInfo};
pub use versions::{CURRENT, KNOWN_VERSIONS};

/// Add the node-information family to `builder`.
pub fn register(builder: RegistryBuilder) -> Result<RegistryBuilder, RegistryError> {
    builder
        .register::<NodeInfo>()?
        .register::<Build>()?
        .register::<OsInfo>()?
        .register::<PluginsAndModules>()
}

/// Registry holding the node-information family over [`KNOWN_VERSIONS`].
pub fn registry() -> Result<Registry, RegistryError> {
    let registry = register(Registry::builder(KNOWN_VERSIONS))?.build();
    tracing::debug!(
        records = registry.record_types().count(),
        current = %CURRENT,
        "node registry built"
    );
    Ok(registry)
}
