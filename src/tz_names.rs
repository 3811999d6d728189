use std::collections::BTreeMap;

use chrono_tz::TZ_VARIANTS;
use lazy_static::lazy_static;

lazy_static! {
    /// Region to city-list table behind the location picker, derived from
    /// the tz database so every offered entry resolves by construction.
    pub static ref TZ_NAMES: BTreeMap<&'static str, Vec<&'static str>> = {
        let mut names: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
        for tz in TZ_VARIANTS.iter() {
            if let Some((zone, location)) = tz.name().split_once('/') {
                names.entry(zone).or_default().push(location);
            }
        }
        for locations in names.values_mut() {
            locations.sort_unstable();
        }
        names
    };
}

/// `"America/New_York"` is shown as `"New York"`; underscores only ever
/// appear in database keys, not on screen.
pub fn display_location(location: &str) -> String {
    location.replace('_', " ")
}
