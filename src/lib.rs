// Library exports for the editor binding, the CLI and the integration tests.
//
// Everything runs on the caller's thread. The only lock in the crate is the
// `parking_lot::Mutex` around the debug log file in `debug`.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod cli;
pub mod error;
pub mod events;
pub mod host;
pub mod layer;
pub mod menu;
pub mod plugin;
pub mod registry;
pub mod store;
pub mod unique_id;

pub use error::{LayoutError, Result};
pub use events::{Signal, SubscriptionId};
pub use layer::{Color, LayerKind, LayerSnapshot};
pub use plugin::{ReselectLayers, StartupLayers};
pub use registry::{LayoutEntry, LayoutRegistry};
pub use store::LayoutStore;
