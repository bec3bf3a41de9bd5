//! Ephemeral shadow copies of a module tree.
//!
//! Linting an unsaved buffer must not touch the real working tree, yet the
//! external tool resolves imports relative to the module root. This crate
//! builds a throwaway directory that mirrors the relevant part of the module
//! tree through symbolic links, overlays the live buffer as a single real
//! file, and removes the whole thing afterwards without ever following a
//! link into the real tree.
//!
//! - [`to_shadow`] and [`to_real`] translate paths between the two trees.
//! - [`ShadowTreeBuilder`] mirrors the target's ancestor chain up to the
//!   module root; [`FlatTreeBuilder`] links only the package's sources.
//! - [`materialize`] writes the buffer into the mirrored slot.
//! - [`reap`] tears a tree down; [`ShadowRoot`] does so automatically when
//!   dropped.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use shadowlint_workspace::{ShadowTreeBuilder, has_vendor_marker, materialize};
//!
//! # fn main() -> Result<(), shadowlint_workspace::ShadowError> {
//! let module_root = Path::new("/home/u/proj");
//! let target = Path::new("/home/u/proj/svc/main.go");
//! assert!(has_vendor_marker(module_root, Path::new("/home/u/proj/svc")));
//!
//! let shadow = ShadowTreeBuilder::new(module_root).build(target)?;
//! let slot = materialize(shadow.path(), module_root, target, "package main\n")?;
//! assert!(slot.starts_with(shadow.path()));
//! drop(shadow);
//! # Ok(()) }
//! ```

mod builder;
mod error;
mod flat;
mod link;
mod materialize;
mod path_map;
mod reaper;
mod root;
mod vendor;

#[cfg(test)]
mod tests;

pub use builder::ShadowTreeBuilder;
pub use error::{PathOutsideRootError, ReapError, ShadowError};
pub use flat::FlatTreeBuilder;
pub use materialize::{materialize, materialize_at};
pub use path_map::{PathMapper, relative_to, to_real, to_shadow};
pub use reaper::{ReapReport, reap};
pub use root::ShadowRoot;
pub use vendor::has_vendor_marker;
