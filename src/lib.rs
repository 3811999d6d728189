//! Analog world-clock action for a control-surface device host.
//!
//! The host delivers two kinds of events: a periodic tick and on-demand
//! image requests, identified by an opaque action parameter holding an IANA
//! timezone key such as `"Europe/Zurich"`. The first successful render of a
//! parameter records it in a concurrent registry; every tick marks all
//! recorded parameters stale so the host re-requests their images.

mod action;
mod bitmap;
mod error;
mod hands;
mod host;
mod l10n;
mod registry;
mod tz_names;

pub use action::WorldClockAction;
pub use bitmap::{Bitmap, BitmapBuilder};
pub use error::Error;
pub use host::{
    ImageSize, Invalidator, PluginHandle, ProfileActionTree, TickCallback, TickSource, TreeItem,
    TreeNode,
};
pub use registry::KnownParams;
