//! Hash containers used by descriptors and the registry, re-exports *hashbrown* and *foldhash*.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

pub use foldhash;
pub use hashbrown;

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6A09E667F3BCC908);

/// A hasher whose results only depend on the input.
pub type FixedHasher = FoldHasher<'static>;

/// Fixed hash state based on `foldhash` with a crate-local seed.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use tc_codec::hash::FixedHashState;
///
/// let hash = |v: &str| {
///     let mut hasher = FixedHashState.build_hasher();
///     v.hash(&mut hasher);
///     hasher.finish()
/// };
/// assert_eq!(hash("name"), hash("name"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;
