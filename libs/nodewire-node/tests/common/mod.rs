#![allow(dead_code)]

use std::collections::BTreeMap;

use nodewire_api::Version;
use nodewire_node::thread_pool::ThreadPoolEntry;
use nodewire_node::versions::{V_2_1_0, V_2_2_0, V_2_4_0, V_5_0_0};
use nodewire_node::{
    BoundTransportAddress, Build, DiscoveryNode, HttpInfo, JvmInfo, NodeInfo, OsInfo, PluginInfo,
    PluginsAndModules, ProcessInfo, Settings, ThreadPoolInfo, TransportAddress, TransportInfo,
};

pub fn dummy_plugin_info() -> PluginInfo {
    PluginInfo {
        name: "dummy_plugin_name".into(),
        version: "dummyVersion".into(),
        description: "dummy plugin description".into(),
        classname: "DummyPluginName".into(),
        jvm: true,
        site: false,
        isolated: true,
    }
}

pub fn dummy_os_info() -> OsInfo {
    OsInfo {
        refresh_interval: 1000,
        available_processors: 4,
        allocated_processors: 2,
        name: Some("dummy_name".into()),
        arch: Some("dummy_arch".into()),
        version: Some("dummy_version".into()),
    }
}

pub fn dummy_bound_address() -> BoundTransportAddress {
    BoundTransportAddress::single(TransportAddress::Dummy)
}

pub fn jvm_info() -> JvmInfo {
    JvmInfo {
        pid: 31337,
        version: "1.8.0_72".into(),
        vm_name: "OpenJDK 64-Bit Server VM".into(),
        vm_version: "25.72-b15".into(),
        vm_vendor: "Oracle Corporation".into(),
        start_time: 1_453_900_000_000,
        heap_init: 256 << 20,
        heap_max: 1 << 30,
        non_heap_init: 2 << 20,
        non_heap_max: 0,
        direct_max: 1 << 30,
        input_arguments: vec!["-Xms256m".into(), "-Xmx1g".into()],
        gc_collectors: vec!["ParNew".into(), "ConcurrentMarkSweep".into()],
        memory_pools: vec!["Code Cache".into(), "Metaspace".into()],
    }
}

/// One module and one plugin with identical content, like a stock node
/// with a single extra plugin installed.
pub fn create_node_info() -> NodeInfo {
    let mut plugins = PluginsAndModules::new();
    plugins.add_module(dummy_plugin_info());
    plugins.add_plugin(dummy_plugin_info());

    NodeInfo {
        node: Some(DiscoveryNode::new("test_node", "node-1", TransportAddress::Dummy, V_2_1_0)),
        version: Some(V_2_4_0),
        build: Some(Build::new("a1b2c3d", "2016-01-27T13:32:39Z", true)),
        service_attributes: BTreeMap::from([("test".to_string(), "attribute".to_string())]),
        settings: Some(Settings::builder().put("test", "setting").build()),
        os: Some(dummy_os_info()),
        process: Some(ProcessInfo {
            refresh_interval: 1000,
            id: 4711,
            mlockall: true,
        }),
        jvm: Some(jvm_info()),
        thread_pool: Some(ThreadPoolInfo {
            pools: vec![ThreadPoolEntry::fixed("test_threadpool", 5)],
        }),
        transport: Some(TransportInfo {
            address: dummy_bound_address(),
            profile_addresses: BTreeMap::from([("test_address".to_string(), dummy_bound_address())]),
        }),
        http: Some(HttpInfo {
            address: dummy_bound_address(),
            max_content_length: 104_857_600,
        }),
        plugins: Some(plugins),
        total_indexing_buffer: Some(64 << 20),
    }
}

/// What a reader at `version` gets back from `info`.
pub fn restricted(info: &NodeInfo, version: Version) -> NodeInfo {
    let mut info = info.clone();
    if version.before(V_5_0_0) {
        info.total_indexing_buffer = None;
        if let Some(build) = info.build.as_mut() {
            build.snapshot = false;
        }
    }
    if version.before(V_2_2_0) {
        if let Some(os) = info.os.as_mut() {
            os.name = None;
            os.arch = None;
            os.version = None;
        }
        // the legacy layout regroups plugins ahead of modules
        if let Some(plugins) = info.plugins.as_mut() {
            plugins.entries.sort_by_key(|e| e.origin.tag());
        }
    }
    info
}
