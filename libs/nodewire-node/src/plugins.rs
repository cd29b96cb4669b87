//! Installed plugins and modules.
//!
//! Before 2.2.0 the wire carried two separate lists and readers of that era
//! know nothing about modules. From 2.2.0 on a single list of origin-tagged
//! entries is streamed. [`PluginsAndModules`] always holds the tagged shape;
//! its legacy descriptor goes through the bridge.

use nodewire_api::{
    merge_for_current, split_for_legacy, Origin, RecordSchema, StreamError, StreamInput,
    StreamOutput, Tagged, VersionRange, VersionedRecord, WireValue,
};
use serde::{Deserialize, Serialize};

use crate::versions::V_2_2_0;

/// Wire origin of a user-installed plugin.
pub const PLUGIN: Origin = Origin::Primary;
/// Wire origin of a bundled module.
pub const MODULE: Origin = Origin::Secondary;

// ════════════════════════════════════════════════════════════════
//  PluginInfo
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub classname: String,
    #[serde(default)]
    pub jvm: bool,
    #[serde(default)]
    pub site: bool,
    #[serde(default)]
    pub isolated: bool,
}

impl WireValue for PluginInfo {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_string(&self.name)?;
        out.write_string(&self.description)?;
        out.write_bool(self.site);
        out.write_bool(self.jvm);
        out.write_string(&self.version)?;
        out.write_string(&self.classname)?;
        out.write_bool(self.isolated);
        Ok(())
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            name: input.read_string()?,
            description: input.read_string()?,
            site: input.read_bool()?,
            jvm: input.read_bool()?,
            version: input.read_string()?,
            classname: input.read_string()?,
            isolated: input.read_bool()?,
        })
    }
}

// ════════════════════════════════════════════════════════════════
//  PluginsAndModules
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Grouped", into = "Grouped")]
pub struct PluginsAndModules {
    pub entries: Vec<Tagged<PluginInfo>>,
}

impl PluginsAndModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_plugin(&mut self, info: PluginInfo) {
        self.entries.push(Tagged { origin: PLUGIN, item: info });
    }

    pub fn add_module(&mut self, info: PluginInfo) {
        self.entries.push(Tagged { origin: MODULE, item: info });
    }

    pub fn plugin_infos(&self) -> Vec<&PluginInfo> {
        self.with_origin(PLUGIN)
    }

    pub fn module_infos(&self) -> Vec<&PluginInfo> {
        self.with_origin(MODULE)
    }

    /// Plugins followed by modules, untagged: what a reader from before
    /// 2.2.0 takes to be the plugin list.
    pub fn legacy_flat_view(&self) -> Vec<PluginInfo> {
        let (mut plugins, modules) = split_for_legacy(&self.entries);
        plugins.extend(modules);
        plugins
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn with_origin(&self, origin: Origin) -> Vec<&PluginInfo> {
        self.entries
            .iter()
            .filter(|e| e.origin == origin)
            .map(|e| &e.item)
            .collect()
    }
}

/// JSON shape: `{"plugins": [...], "modules": [...]}`.
#[derive(Serialize, Deserialize)]
struct Grouped {
    #[serde(default)]
    plugins: Vec<PluginInfo>,
    #[serde(default)]
    modules: Vec<PluginInfo>,
}

impl From<Grouped> for PluginsAndModules {
    fn from(g: Grouped) -> Self {
        Self {
            entries: merge_for_current(g.plugins, g.modules),
        }
    }
}

impl From<PluginsAndModules> for Grouped {
    fn from(p: PluginsAndModules) -> Self {
        let (plugins, modules) = split_for_legacy(&p.entries);
        Self { plugins, modules }
    }
}

fn write_infos(out: &mut StreamOutput, infos: &[PluginInfo]) -> Result<(), StreamError> {
    out.write_count_i32(infos.len())?;
    for info in infos {
        info.write_to(out)?;
    }
    Ok(())
}

fn read_infos(input: &mut StreamInput<'_>) -> Result<Vec<PluginInfo>, StreamError> {
    let count = input.read_count_i32()?;
    let mut infos = Vec::with_capacity(input.capacity_hint(count));
    for _ in 0..count {
        infos.push(input.read_value()?);
    }
    Ok(infos)
}

impl VersionedRecord for PluginsAndModules {
    const RECORD_TYPE: &'static str = "plugins_and_modules";

    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new(Self::RECORD_TYPE)
            .field(
                "entries",
                VersionRange::until(V_2_2_0),
                |r, enc| {
                    let (plugins, modules) = split_for_legacy(&r.entries);
                    write_infos(&mut enc.out, &plugins)?;
                    write_infos(&mut enc.out, &modules)?;
                    Ok(())
                },
                |r, dec| {
                    let plugins = read_infos(&mut dec.input)?;
                    let modules = read_infos(&mut dec.input)?;
                    r.entries = merge_for_current(plugins, modules);
                    Ok(())
                },
            )
            .field(
                "entries",
                VersionRange::since(V_2_2_0),
                |r, enc| {
                    enc.out.write_count_i32(r.entries.len())?;
                    for entry in &r.entries {
                        enc.out.write_u8(entry.origin.tag());
                        entry.item.write_to(&mut enc.out)?;
                    }
                    Ok(())
                },
                |r, dec| {
                    let count = dec.input.read_count_i32()?;
                    let mut entries = Vec::with_capacity(dec.input.capacity_hint(count));
                    for _ in 0..count {
                        let origin = Origin::from_tag(dec.input.read_u8()?)?;
                        entries.push(Tagged {
                            origin,
                            item: dec.input.read_value()?,
                        });
                    }
                    r.entries = entries;
                    Ok(())
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str) -> PluginInfo {
        PluginInfo {
            name: name.into(),
            version: "1.0".into(),
            description: format!("{name} plugin"),
            classname: format!("org.example.{name}"),
            jvm: true,
            ..PluginInfo::default()
        }
    }

    #[test]
    fn legacy_view_lists_plugins_then_modules() {
        let mut p = PluginsAndModules::new();
        p.add_module(info("lang-expression"));
        p.add_plugin(info("analysis-icu"));
        p.add_module(info("lang-groovy"));

        let names: Vec<_> = p.legacy_flat_view().into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["analysis-icu", "lang-expression", "lang-groovy"]);
        assert_eq!(p.plugin_infos().len(), 1);
        assert_eq!(p.module_infos().len(), 2);
    }

    #[test]
    fn json_groups_by_origin() {
        let mut p = PluginsAndModules::new();
        p.add_module(info("m"));
        p.add_plugin(info("p"));

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["plugins"][0]["name"], "p");
        assert_eq!(json["modules"][0]["name"], "m");

        let back: PluginsAndModules = serde_json::from_value(json).unwrap();
        assert_eq!(back.plugin_infos(), p.plugin_infos());
        assert_eq!(back.module_infos(), p.module_infos());
    }

    #[test]
    fn plugin_info_field_order_is_fixed() {
        let mut out = StreamOutput::new();
        info("x").write_to(&mut out).unwrap();
        let bytes = out.into_bytes();
        // name, description, site, jvm
        assert_eq!(&bytes[..2], &[1, b'x']);
        assert_eq!(bytes[2] as usize, "x plugin".len());
        assert_eq!(&bytes[11..13], &[0, 1]);
    }
}
