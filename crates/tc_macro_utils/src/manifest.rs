use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how generated code should name
/// one of the workspace crates.
///
/// # Example
///
/// ```rust
/// # use tc_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("tc_codec"));
/// ```
///
/// Reading and parsing the manifest is not free, resolve a path once per
/// macro invocation and pass it around.
///
/// # Resolution rules
///
/// 1. If the requested crate is a direct dependency, return `::crate_name`.
/// 2. If the requested crate name begins with `tc_` and the caller depends on
///    the umbrella crate `tc_core`, return `::tc_core::short_name`
///    (e.g. `tc_codec` -> `::tc_core::codec`).
/// 3. Repeat step 1-2 in `dev-dependencies`.
/// 4. Otherwise, fall back to `::crate_name`.
///
/// A crate that derives on its own types should declare
/// `extern crate self as crate_name;` so that the fallback resolves.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const UMBRELLA_NAME: &str = "tc_core";
const CRATE_PREFIX: &str = "tc_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn modified_time_of(path: &Path) -> std::io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    #[inline(never)]
    fn parse_manifest(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()));
        Document::parse(text.into_boxed_str())
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    fn absolute(segments: &[&str]) -> syn::Path {
        let joined = segments.join("::");
        syn::parse_str(&format!("::{joined}"))
            .unwrap_or_else(|_| panic!("`::{joined}` is not a valid path"))
    }

    fn lookup(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::absolute(&[name]));
        }
        let short = name.strip_prefix(CRATE_PREFIX)?;
        deps.contains_key(UMBRELLA_NAME)
            .then(|| Self::absolute(&[UMBRELLA_NAME, short]))
    }

    /// Return a [`syn::Path`] for the package named `name` as seen from the
    /// caller. See the type-level documentation for the resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .filter_map(|section| match self.manifest.get(section) {
                Some(Item::Table(deps)) => Self::lookup(deps, name),
                _ => None,
            })
            .next()
            .unwrap_or_else(|| Self::absolute(&[name]))
    }

    /// Run `func` against the caller's [`Manifest`].
    ///
    /// Parsed manifests are cached per path and re-read when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time =
            Self::modified_time_of(&path).expect("The Cargo.toml should have a modified time.");

        {
            let cached = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cached.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            manifest: Self::parse_manifest(&path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}
