//! Process and JVM facts. Both travel as opaque payloads whose layout does
//! not depend on the protocol version.

use nodewire_api::{StreamError, StreamInput, StreamOutput, WireValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub refresh_interval: i64,
    pub id: i64,
    pub mlockall: bool,
}

impl WireValue for ProcessInfo {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_i64(self.refresh_interval);
        out.write_i64(self.id);
        out.write_bool(self.mlockall);
        Ok(())
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            refresh_interval: input.read_i64()?,
            id: input.read_i64()?,
            mlockall: input.read_bool()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JvmInfo {
    pub pid: i64,
    pub version: String,
    pub vm_name: String,
    pub vm_version: String,
    pub vm_vendor: String,
    pub start_time: i64,
    pub heap_init: i64,
    pub heap_max: i64,
    pub non_heap_init: i64,
    pub non_heap_max: i64,
    pub direct_max: i64,
    pub input_arguments: Vec<String>,
    pub gc_collectors: Vec<String>,
    pub memory_pools: Vec<String>,
}

impl WireValue for JvmInfo {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_i64(self.pid);
        out.write_string(&self.version)?;
        out.write_string(&self.vm_name)?;
        out.write_string(&self.vm_version)?;
        out.write_string(&self.vm_vendor)?;
        out.write_i64(self.start_time);
        out.write_i64(self.heap_init);
        out.write_i64(self.heap_max);
        out.write_i64(self.non_heap_init);
        out.write_i64(self.non_heap_max);
        out.write_i64(self.direct_max);
        out.write_string_array(&self.input_arguments)?;
        out.write_string_array(&self.gc_collectors)?;
        out.write_string_array(&self.memory_pools)
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            pid: input.read_i64()?,
            version: input.read_string()?,
            vm_name: input.read_string()?,
            vm_version: input.read_string()?,
            vm_vendor: input.read_string()?,
            start_time: input.read_i64()?,
            heap_init: input.read_i64()?,
            heap_max: input.read_i64()?,
            non_heap_init: input.read_i64()?,
            non_heap_max: input.read_i64()?,
            direct_max: input.read_i64()?,
            input_arguments: input.read_string_array()?,
            gc_collectors: input.read_string_array()?,
            memory_pools: input.read_string_array()?,
        })
    }
}
