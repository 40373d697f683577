use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier for circuit nodes.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
///
/// Ids are handed out by the graph in increasing order and never reused,
/// so ordering by id is ordering by creation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    ///
    /// Panics on `u32::MAX`; use [`Id::try_from_index`] for indices that
    /// come from outside the graph.
    pub fn from_index(index: u32) -> Self {
        Self::try_from_index(index).expect("index+1 is nonzero")
    }

    /// Create an Id from a 0-based index, or `None` if `index + 1` overflows.
    pub fn try_from_index(index: u32) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroU32::new).map(Self)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.index(), f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Id {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.index())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Id {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = <u32 as serde::Deserialize>::deserialize(deserializer)?;
        Id::try_from_index(index).ok_or_else(|| serde::de::Error::custom("node id out of range"))
    }
}

/// Identifier of a node (primary input or gate) in a circuit graph.
pub type NodeId = Id;
