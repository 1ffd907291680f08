//! Font registration for the `ab_glyph` text path, which does not discover OS fonts.

use crate::error::{Error, Result};
use plotters::style::FontStyle;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Font file registered as "sans-serif"; set once, on the first successful registration.
static REGISTERED: OnceLock<PathBuf> = OnceLock::new();

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_FONTS.iter().map(PathBuf::from))
        .collect()
}

fn try_register(path: &Path) -> bool {
    let Ok(bytes) = std::fs::read(path) else {
        return false;
    };
    // plotters keeps a reference to the font data for the life of the process.
    let data: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    match plotters::style::register_font("sans-serif", FontStyle::Normal, data) {
        Ok(()) => true,
        Err(_) => {
            log::warn!("{} is not a usable font", path.display());
            false
        }
    }
}

/// Register a "sans-serif" font from `explicit` or a common system location.
pub fn ensure_fonts_registered(explicit: Option<&Path>) -> Result<()> {
    if REGISTERED.get().is_some() {
        return Ok(());
    }
    for path in candidates(explicit) {
        if try_register(&path) {
            log::debug!("registered chart font {}", path.display());
            let _ = REGISTERED.set(path);
            return Ok(());
        }
    }
    Err(Error::FontUnavailable)
}

/// Whether chart text can be rendered on this machine.
pub fn font_available(explicit: Option<&Path>) -> bool {
    ensure_fonts_registered(explicit).is_ok()
}
