//! Reconciles a legacy pair of collections with the current single
//! collection of origin-tagged entries.
//!
//! Only the descriptor of the legacy shape calls into this module; the rest
//! of the codec never branches on the split.

use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// Which legacy collection an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Primary,
    Secondary,
}

impl Origin {
    pub fn tag(self) -> u8 {
        match self {
            Origin::Primary => 0,
            Origin::Secondary => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, StreamError> {
        match tag {
            0 => Ok(Origin::Primary),
            1 => Ok(Origin::Secondary),
            other => Err(StreamError::Malformed(format!("origin tag {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tagged<I> {
    pub origin: Origin,
    pub item: I,
}

impl<I> Tagged<I> {
    pub fn primary(item: I) -> Self {
        Self {
            origin: Origin::Primary,
            item,
        }
    }

    pub fn secondary(item: I) -> Self {
        Self {
            origin: Origin::Secondary,
            item,
        }
    }
}

/// Current shape → legacy shape. Relative order inside each group is kept.
pub fn split_for_legacy<I: Clone>(tagged: &[Tagged<I>]) -> (Vec<I>, Vec<I>) {
    let mut primary = Vec::new();
    let mut secondary = Vec::new();
    for entry in tagged {
        match entry.origin {
            Origin::Primary => primary.push(entry.item.clone()),
            Origin::Secondary => secondary.push(entry.item.clone()),
        }
    }
    (primary, secondary)
}

/// Legacy shape → current shape: the primary group, then the secondary group.
pub fn merge_for_current<I>(primary: Vec<I>, secondary: Vec<I>) -> Vec<Tagged<I>> {
    let mut tagged = Vec::with_capacity(primary.len() + secondary.len());
    tagged.extend(primary.into_iter().map(Tagged::primary));
    tagged.extend(secondary.into_iter().map(Tagged::secondary));
    tagged
}
