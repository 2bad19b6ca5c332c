//! Contains traits used to convert between enums and their index or name


/// Trait to get the number of elements in an enum
pub trait EnumCountT {
    /// Count or number of element in an enum
    const COUNT : usize;
}

/// Trait to get an enum from a given index
pub trait EnumFromIndexT: Sized {
    /// Try to convert an index to an enum
    fn from_idx(idx: usize) -> Option<Self>;

    /// Try to convert an index to an enum, if it couldn't convert it, return a default value
    fn from_idx_or(idx: usize, default: Self) -> Self {
        Self::from_idx(idx).unwrap_or(default)
    }
}

/// Trait to parse an enum from its name
pub trait EnumFromNameT: Sized {
    /// Try to parse the enum from a string slice.
    /// 
    /// Matching is case-insensitive.
    fn parse(s: &str) -> Option<Self>;
}
