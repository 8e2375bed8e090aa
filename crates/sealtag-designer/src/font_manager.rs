use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use parking_lot::Mutex;
use rusttype::Font;
use sealtag_settings::FontSettings;
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};
use tracing::{debug, info};

use crate::error::FontError;

/// Well-known font files tried in order when nothing is configured
pub const CANDIDATE_PATHS: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        debug!("Font database holds {} faces", db.len());
        db
    })
}

fn path_cache() -> &'static Mutex<HashMap<PathBuf, &'static Font<'static>>> {
    static CACHE: OnceLock<Mutex<HashMap<PathBuf, &'static Font<'static>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

fn family_cache() -> &'static Mutex<HashMap<String, &'static Font<'static>>> {
    static CACHE: OnceLock<Mutex<HashMap<String, &'static Font<'static>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

pub fn list_font_families() -> Vec<String> {
    let mut set = HashSet::new();
    for face in db().faces() {
        for (name, _) in &face.families {
            set.insert(name.clone());
        }
    }
    let mut out: Vec<_> = set.into_iter().collect();
    out.sort();
    out
}

/// Loads a font file once; later calls with the same path share it.
///
/// The cache lock is held across the load so concurrent callers for the
/// same file wait for the first one instead of loading twice.
pub fn load_font_file(path: &Path) -> Result<&'static Font<'static>, FontError> {
    let mut cache = path_cache().lock();
    if let Some(font) = cache.get(path).copied() {
        return Ok(font);
    }

    let bytes = fs::read(path).map_err(|e| FontError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let font = Font::try_from_vec(bytes)
        .ok_or_else(|| FontError::Invalid(path.display().to_string()))?;
    let font_ref: &'static Font<'static> = Box::leak(Box::new(font));
    cache.insert(path.to_path_buf(), font_ref);
    info!("Loaded font {}", path.display());
    Ok(font_ref)
}

/// Looks up an installed family through the system font database
pub fn font_for_family(family: &str) -> Result<&'static Font<'static>, FontError> {
    let mut cache = family_cache().lock();
    if let Some(font) = cache.get(family).copied() {
        return Ok(font);
    }

    let font = load_font_from_system(family)
        .ok_or_else(|| FontError::FamilyNotFound(family.to_string()))?;
    let font_ref: &'static Font<'static> = Box::leak(Box::new(font));
    cache.insert(family.to_string(), font_ref);
    Ok(font_ref)
}

fn load_font_from_system(family: &str) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other)],
    };

    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, face.index)
        }
        fontdb::Source::Binary(bytes) => {
            Font::try_from_vec_and_index(bytes.as_ref().as_ref().to_vec(), face.index)
        }
    }
}

/// First usable font among the well-known paths, then the system sans-serif.
///
/// Resolved once per process; every caller gets the same answer.
pub fn default_font() -> Result<&'static Font<'static>, FontError> {
    static DEFAULT: OnceLock<Result<&'static Font<'static>, FontError>> = OnceLock::new();
    DEFAULT
        .get_or_init(|| {
            for candidate in CANDIDATE_PATHS {
                let path = Path::new(candidate);
                if path.exists() {
                    if let Ok(font) = load_font_file(path) {
                        return Ok(font);
                    }
                }
            }
            font_for_family("Sans").map_err(|_| FontError::NotFound {
                tried: format!("{}, system sans-serif", CANDIDATE_PATHS.join(", ")),
            })
        })
        .clone()
}

/// Font selected by `settings`: explicit path, then family, then the default
pub fn resolve(settings: &FontSettings) -> Result<&'static Font<'static>, FontError> {
    if let Some(path) = &settings.path {
        return load_font_file(path);
    }
    if let Some(family) = &settings.family {
        return font_for_family(family);
    }
    default_font()
}
