//! Protocol versions the node-information family is defined against.

use nodewire_api::Version;

pub const V_2_0_0: Version = Version::new(2, 0, 0);
pub const V_2_1_0: Version = Version::new(2, 1, 0);
pub const V_2_1_1: Version = Version::new(2, 1, 1);
/// Modules become distinguishable from plugins; OS name/arch/version are streamed.
pub const V_2_2_0: Version = Version::new(2, 2, 0);
pub const V_2_3_0: Version = Version::new(2, 3, 0);
pub const V_2_4_0: Version = Version::new(2, 4, 0);
pub const V_5_0_0: Version = Version::new(5, 0, 0);
pub const V_5_5_0: Version = Version::new(5, 5, 0);

pub const CURRENT: Version = V_5_5_0;

/// Ascending.
pub const KNOWN_VERSIONS: [Version; 8] = [
    V_2_0_0, V_2_1_0, V_2_1_1, V_2_2_0, V_2_3_0, V_2_4_0, V_5_0_0, V_5_5_0,
];

/// Known versions `v` with `low <= v <= high`.
pub fn known_between(low: Version, high: Version) -> impl Iterator<Item = Version> {
    KNOWN_VERSIONS
        .into_iter()
        .filter(move |v| *v >= low && *v <= high)
}
