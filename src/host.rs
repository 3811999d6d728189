//! The contract surface toward the device host. The host owns the event
//! loop; the action only subscribes to its tick and hands images and
//! staleness signals back.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

/// Callback invoked on every host heartbeat. The period is host-controlled.
pub type TickCallback = Box<dyn Fn() + Send + Sync>;

/// Host-emitted periodic tick the action subscribes to once at load.
pub trait TickSource: Send + Sync {
    fn subscribe(&self, callback: TickCallback);
}

/// Capability to tell the host that the image rendered for an action
/// parameter is stale and must be requested again.
pub trait Invalidator: Send + Sync {
    fn action_image_changed(&self, action_parameter: &str);
}

/// Pixel dimensions of the outbound raster, chosen by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Services the host hands to an action at load time.
pub struct PluginHandle {
    pub tick_source: Arc<dyn TickSource>,
    pub invalidator: Arc<dyn Invalidator>,
    /// Host-supplied plugin configuration, e.g. the UI locale.
    pub configuration: BTreeMap<String, String>,
}

/// Hierarchical picker the host renders for parameter selection. Leaf item
/// values come back verbatim as the action parameter.
#[derive(Debug, Serialize)]
pub struct ProfileActionTree {
    pub name: String,
    pub levels: Vec<String>,
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub items: Vec<TreeItem>,
}

#[derive(Debug, Serialize)]
pub struct TreeItem {
    /// Exact tz-database key.
    pub value: String,
    pub display_name: String,
}
