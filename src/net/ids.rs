//! 库所与迁移的强类型编号，取值区间由网结构外部分配：`[0, |P|)` 与 `[0, |T|)`。
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::net::index_vec::Idx;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u32 {
                self.0
            }

            /// LP 中的行/列下标：0 号保留，元素 `i` 落在 `i + 1`。
            pub const fn lp_index(self) -> usize {
                self.0 as usize + 1
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, stringify!($name))?;
                f.debug_tuple("").field(&self.0).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl Idx for $name {
            fn index(self) -> usize {
                self.0 as usize
            }

            fn from_usize(idx: usize) -> Self {
                debug_assert!(idx <= u32::MAX as usize);
                Self(idx as u32)
            }
        }
    };
}

define_id!(PlaceId, "p");
define_id!(TransitionId, "t");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lp_index_skips_sentinel_slot() {
        assert_eq!(PlaceId::new(0).lp_index(), 1);
        assert_eq!(TransitionId::new(4).lp_index(), 5);
    }

    #[test]
    fn display_uses_kind_prefix() {
        assert_eq!(PlaceId::new(3).to_string(), "p3");
        assert_eq!(TransitionId::from_usize(7).to_string(), "t7");
    }
}
