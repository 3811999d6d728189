use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Deserialize;

/// Per-locale, per-action user-facing strings shipped with the plugin.
#[derive(Debug, Default, Deserialize)]
struct Catalog(HashMap<String, HashMap<String, HashMap<String, String>>>);

static RAW_CATALOG: &str = include_str!("../assets/translations.json");

lazy_static! {
    static ref CATALOG: Catalog = serde_json::from_str(RAW_CATALOG).unwrap_or_else(|err| {
        log::warn!("embedded translation catalog unreadable: {err}");
        Catalog::default()
    });
}

fn catalog() -> &'static Catalog {
    &CATALOG
}

/// Looks up translated strings for the locale the host is running under.
pub struct L10n {
    locale: String,
}

impl L10n {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_owned(),
        }
    }

    /// Localized names for one action: the exact locale first, then its
    /// primary language, then `None`.
    pub fn l7d_names(&self, action_id: &str) -> Option<&'static HashMap<String, String>> {
        let lookup =
            |locale: &str| catalog().0.get(locale).and_then(|actions| actions.get(action_id));

        lookup(&self.locale).or_else(|| {
            let language = self.locale.split(['-', '_']).next().unwrap_or_default();
            lookup(language)
        })
    }
}
