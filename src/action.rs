use std::sync::{Arc, Weak};

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

use crate::bitmap::{watchface, Bitmap, BitmapBuilder};
use crate::error::Error;
use crate::hands;
use crate::host::{ImageSize, Invalidator, PluginHandle, ProfileActionTree, TreeItem, TreeNode};
use crate::l10n::L10n;
use crate::registry::KnownParams;
use crate::tz_names::{display_location, TZ_NAMES};

const ACTION_ID: &str = "timeA";

// NOTE: Plugin configuration keys
const LOCALE: &str = "locale";

const SEC_HAND_LENGTH: u32 = 35;
const MIN_HAND_LENGTH: u32 = 30;
const HOUR_HAND_LENGTH: u32 = 20;

const SEC_HAND_COLOR: Rgb888 = Rgb888::new(255, 0, 0);
const HAND_COLOR: Rgb888 = Rgb888::new(120, 120, 120);

/// The analog world-clock action. One instance serves every configured
/// parameter; the only per-parameter state is the known-parameter registry
/// feeding the tick sweep.
pub struct WorldClockAction {
    display_name: String,
    description: String,
    group_name: String,
    zone_label: String,
    location_label: String,
    known_params: Arc<KnownParams>,
    invalidator: Arc<dyn Invalidator>,
}

impl WorldClockAction {
    /// Wires the action to the host: resolves localized names, falling back
    /// to the built-in defaults when the catalog has nothing for the host's
    /// locale, then arms the tick sweep that marks every previously rendered
    /// parameter stale.
    pub fn load(plugin: Weak<PluginHandle>) -> Result<Self, Error> {
        let plugin = plugin.upgrade().ok_or(Error::HostUnavailable)?;

        let locale = plugin
            .configuration
            .get(LOCALE)
            .map(String::as_str)
            .unwrap_or("en");
        let names = L10n::new(locale).l7d_names(ACTION_ID);
        if names.is_none() {
            log::info!("localized names missing for action `{ACTION_ID}`, using built-in defaults");
        }
        let localized = |key: &str, default: &str| {
            names
                .and_then(|names| names.get(key))
                .cloned()
                .unwrap_or_else(|| default.to_owned())
        };

        let action = Self {
            display_name: localized("displayName", "Time Analog"),
            description: localized("description", ""),
            group_name: localized("groupName", "Analog"),
            zone_label: localized("zone", "Zone"),
            location_label: localized("location", "Location"),
            known_params: Arc::new(KnownParams::default()),
            invalidator: Arc::clone(&plugin.invalidator),
        };

        // The tick handler only flags staleness; the host pulls the actual
        // redraw later through `command_image`.
        let known = Arc::clone(&action.known_params);
        let invalidator = Arc::clone(&action.invalidator);
        plugin.tick_source.subscribe(Box::new(move || {
            known.for_each(|param| invalidator.action_image_changed(param));
        }));

        Ok(action)
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// A button press forces an immediate redraw of that parameter's image.
    pub fn run_command(&self, action_parameter: &str) {
        self.invalidator.action_image_changed(action_parameter);
    }

    /// Two-level picker (zone, then location) over the tz-name table. Leaf
    /// values are the exact database keys handed back as action parameters.
    pub fn profile_action_data(&self) -> ProfileActionTree {
        let nodes = TZ_NAMES
            .iter()
            .map(|(zone, locations)| TreeNode {
                name: (*zone).to_owned(),
                items: locations
                    .iter()
                    .map(|location| TreeItem {
                        value: format!("{zone}/{location}"),
                        display_name: display_location(location),
                    })
                    .collect(),
            })
            .collect();

        ProfileActionTree {
            name: "Select location".to_owned(),
            levels: vec![self.zone_label.clone(), self.location_label.clone()],
            nodes,
        }
    }

    /// Composes the outbound image for one parameter at the current instant.
    pub fn command_image(&self, action_parameter: &str, size: ImageSize) -> Result<Bitmap, Error> {
        self.command_image_at(action_parameter, size, Utc::now())
    }

    fn command_image_at(
        &self,
        action_parameter: &str,
        size: ImageSize,
        instant: DateTime<Utc>,
    ) -> Result<Bitmap, Error> {
        let mut builder = BitmapBuilder::new(size);
        let _ = builder.clear(Rgb888::BLACK);
        if action_parameter.is_empty() {
            // An unconfigured button shows a blank face.
            return Ok(builder.into_image());
        }

        let zone: Tz = action_parameter
            .parse()
            .map_err(|_| Error::UnknownTimeZone(action_parameter.to_owned()))?;
        let now = instant.with_timezone(&zone);
        self.known_params.record(action_parameter);

        builder.set_background_image(watchface());
        let center = Point::new(size.width as i32 / 2, size.height as i32 / 2);

        let tip = hands::minute_second_coord(now.second(), SEC_HAND_LENGTH, size.width, size.height);
        builder.draw_line(tip, center, SEC_HAND_COLOR, 1);
        let tip = hands::minute_second_coord(now.minute(), MIN_HAND_LENGTH, size.width, size.height);
        builder.draw_line(tip, center, HAND_COLOR, 2);
        let tip = hands::hour_coord(
            now.hour() % 12,
            now.minute(),
            HOUR_HAND_LENGTH,
            size.width,
            size.height,
        );
        builder.draw_line(tip, center, HAND_COLOR, 3);

        Ok(builder.into_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TickCallback;
    use crate::host::TickSource;

    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::TimeZone;

    #[derive(Default)]
    struct ManualTickSource {
        callbacks: Mutex<Vec<TickCallback>>,
    }

    impl TickSource for ManualTickSource {
        fn subscribe(&self, callback: TickCallback) {
            self.callbacks.lock().unwrap().push(callback);
        }
    }

    impl ManualTickSource {
        fn fire(&self) {
            for callback in self.callbacks.lock().unwrap().iter() {
                callback();
            }
        }
    }

    #[derive(Default)]
    struct RecordingInvalidator {
        invalidated: Mutex<Vec<String>>,
    }

    impl Invalidator for RecordingInvalidator {
        fn action_image_changed(&self, action_parameter: &str) {
            self.invalidated
                .lock()
                .unwrap()
                .push(action_parameter.to_owned());
        }
    }

    impl RecordingInvalidator {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.invalidated.lock().unwrap())
        }
    }

    fn host(locale: &str) -> (Arc<PluginHandle>, Arc<ManualTickSource>, Arc<RecordingInvalidator>) {
        let tick = Arc::new(ManualTickSource::default());
        let invalidator = Arc::new(RecordingInvalidator::default());
        let plugin = Arc::new(PluginHandle {
            tick_source: tick.clone(),
            invalidator: invalidator.clone(),
            configuration: BTreeMap::from([(LOCALE.to_owned(), locale.to_owned())]),
        });
        (plugin, tick, invalidator)
    }

    fn loaded(locale: &str) -> (WorldClockAction, Arc<ManualTickSource>, Arc<RecordingInvalidator>) {
        let (plugin, tick, invalidator) = host(locale);
        let action = WorldClockAction::load(Arc::downgrade(&plugin)).unwrap();
        // The handle may go away after load without affecting the action.
        drop(plugin);
        (action, tick, invalidator)
    }

    const SIZE: ImageSize = ImageSize::new(80, 80);

    #[test]
    fn action_is_shareable_across_host_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WorldClockAction>();
    }

    #[test]
    fn load_fails_when_the_host_handle_is_gone() {
        let (plugin, _tick, _invalidator) = host("en");
        let weak = Arc::downgrade(&plugin);
        drop(plugin);
        assert!(matches!(
            WorldClockAction::load(weak),
            Err(Error::HostUnavailable)
        ));
    }

    #[test]
    fn localized_names_resolve() {
        let (action, _, _) = loaded("de");
        assert_eq!(action.display_name(), "Zeit analog");
        assert_eq!(action.group_name(), "Analog");
        assert!(!action.description().is_empty());
    }

    #[test]
    fn missing_localization_falls_back_to_defaults() {
        let (action, _, _) = loaded("xx");
        assert_eq!(action.display_name(), "Time Analog");
        assert_eq!(action.group_name(), "Analog");
        assert_eq!(action.description(), "");
        assert_eq!(action.profile_action_data().levels, vec!["Zone", "Location"]);
    }

    #[test]
    fn run_command_invalidates_immediately() {
        let (action, _, invalidator) = loaded("en");
        action.run_command("Europe/Zurich");
        assert_eq!(invalidator.take(), vec!["Europe/Zurich".to_owned()]);
    }

    #[test]
    fn empty_parameter_renders_a_blank_face() {
        let (action, _, _) = loaded("en");
        for size in [SIZE, ImageSize::new(60, 60), ImageSize::new(116, 116)] {
            let image = action.command_image("", size).unwrap();
            let blank = BitmapBuilder::new(size).into_image();
            assert_eq!(image, blank);
        }
        assert!(action.known_params.is_empty());
    }

    #[test]
    fn unknown_timezone_fails_without_touching_the_registry() {
        let (action, tick, invalidator) = loaded("en");
        let result = action.command_image("Nowhere/Fake", SIZE);
        assert!(matches!(result, Err(Error::UnknownTimeZone(_))));
        assert!(!action.known_params.contains("Nowhere/Fake"));

        tick.fire();
        assert!(invalidator.take().is_empty());
    }

    #[test]
    fn rendering_records_the_parameter_once() {
        let (action, _, _) = loaded("en");
        action.command_image("Europe/Zurich", SIZE).unwrap();
        action.command_image("Europe/Zurich", SIZE).unwrap();
        assert_eq!(action.known_params.len(), 1);
    }

    #[test]
    fn each_tick_invalidates_every_known_parameter() {
        let (action, tick, invalidator) = loaded("en");
        let zones = ["Europe/Zurich", "Asia/Tokyo", "America/New_York"];
        for zone in zones {
            action.command_image(zone, SIZE).unwrap();
        }

        tick.fire();
        let mut invalidated = invalidator.take();
        invalidated.sort();
        let mut expected: Vec<String> = zones.iter().map(|zone| (*zone).to_owned()).collect();
        expected.sort();
        assert_eq!(invalidated, expected);

        // A repeat render must not inflate the next sweep.
        action.command_image(zones[0], SIZE).unwrap();
        tick.fire();
        assert_eq!(invalidator.take().len(), zones.len());
    }

    #[test]
    fn hands_point_where_the_clock_reads() {
        let (action, _, _) = loaded("en");
        // 12:00:15 UTC: second hand due east, minute hand due north.
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 15).unwrap();
        let image = action
            .command_image_at("Etc/UTC", SIZE, instant)
            .unwrap();

        // Second hand tip, 35 px east of center.
        assert_eq!(image.pixel(75, 40), Some(SEC_HAND_COLOR));
        // Minute hand tip, 30 px north of center.
        assert_eq!(image.pixel(40, 10), Some(HAND_COLOR));
        // Hour hand shaft toward 12.
        assert_eq!(image.pixel(40, 25), Some(HAND_COLOR));
        // Watch face composited underneath, away from any hand.
        assert_ne!(image.pixel(40, 70), Some(Rgb888::BLACK));
    }

    #[test]
    fn timezone_offset_moves_the_hands() {
        let (action, _, _) = loaded("en");
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let utc = action.command_image_at("Etc/UTC", SIZE, instant).unwrap();
        let tokyo = action
            .command_image_at("Asia/Tokyo", SIZE, instant)
            .unwrap();
        assert_ne!(utc, tokyo);
    }

    #[test]
    fn profile_tree_offers_resolvable_locations() {
        let (action, _, _) = loaded("en");
        let tree = action.profile_action_data();
        assert_eq!(tree.name, "Select location");
        assert_eq!(tree.levels, vec!["Zone", "Location"]);

        let america = tree
            .nodes
            .iter()
            .find(|node| node.name == "America")
            .unwrap();
        let new_york = america
            .items
            .iter()
            .find(|item| item.value == "America/New_York")
            .unwrap();
        assert_eq!(new_york.display_name, "New York");
    }

    #[test]
    fn profile_tree_levels_are_localized() {
        let (action, _, _) = loaded("de");
        assert_eq!(action.profile_action_data().levels, vec!["Zone", "Ort"]);
    }
}
