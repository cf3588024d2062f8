use std::{fmt::Debug, hash::Hash};

/// Dense numeric ids handed out in increasing order
pub trait Index: Copy + 'static + Eq + Ord + Debug + Hash {
    fn new(idx: usize) -> Self;

    fn index(self) -> usize;

    #[inline]
    fn increment_by(&mut self, amount: usize) {
        *self = Self::new(self.index() + amount);
    }
}

/// Declares a `u32` id implementing [`Index`]. Its textual name is `$prefix`
/// followed by the number, e.g. `V3`.
macro_rules! simple_index {
    ($(#[$attr:meta])* $vis:vis struct $name:ident = $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
        $vis struct $name(u32);

        impl $name {
            pub fn name(self) -> String {
                format!(concat!($prefix, "{}"), self.0)
            }
        }

        impl $crate::index::Index for $name {
            fn new(idx: usize) -> Self {
                Self(idx as _)
            }

            fn index(self) -> usize {
                self.0 as _
            }
        }
    };
}

pub(crate) use simple_index;
