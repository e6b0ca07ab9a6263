//! System font lookup for the raster target.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::Font;
use tracing::debug;

#[derive(Clone, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
}

type FontCache = Mutex<HashMap<FontKey, Option<Arc<Font<'static>>>>>;

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "system fonts loaded");
        db
    })
}

/// The closest installed face for `family`, falling back to the default
/// sans-serif face. `None` when the system has no usable font at all.
pub(crate) fn font_for(family: &str, bold: bool) -> Option<Arc<Font<'static>>> {
    static CACHE: OnceLock<FontCache> = OnceLock::new();
    let cache = CACHE.get_or_init(FontCache::default);

    let key = FontKey { family: family.to_owned(), bold };
    let mut cached = cache.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(font) = cached.get(&key) {
        return font.clone();
    }

    let loaded = load_font(family, bold).map(Arc::new);
    if loaded.is_none() {
        debug!(family, bold, "no usable font face; text will not be drawn");
    }
    cached.insert(key, loaded.clone());
    loaded
}

fn load_font(family: &str, bold: bool) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" => vec![Family::SansSerif],
        name => vec![Family::Name(name), Family::SansSerif],
    };
    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db().query(&query)?;
    db().with_face_data(id, |data, index| Font::try_from_vec_and_index(data.to_vec(), index))
        .flatten()
}
