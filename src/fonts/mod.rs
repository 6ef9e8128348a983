//! Font loading for the PDF renderer.
//!
//! The Burmese template needs a font with Myanmar glyphs, so the default family
//! is Noto Sans Myanmar. Its files are searched for in this order:
//!
//! 1. the directory named by `COUNTER_RITUAL_FONTS_DIR`
//! 2. `assets/fonts` next to the running executable
//! 3. `assets/fonts` in the crate sources
//!
//! Only the regular and bold faces are required; the italic faces fall back to
//! their upright counterparts. When no directory qualifies, the Windows
//! "Myanmar Text" family is tried. If that fails as well the caller gets an
//! error for which [`fonts_missing`] returns `true`, meaning PDF output is not
//! available on this machine.
//!
//! `genpdf` places glyphs one codepoint at a time and does no complex-script
//! shaping. Burmese text in the PDF therefore shows unshaped Myanmar glyphs
//! (no reordering of medials and vowel signs) even with the right font
//! installed. The Markdown report is the authoritative copy.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, warn};

/// Name of the default font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "NotoSansMyanmar";

/// Environment variable naming a directory with the default font family.
pub const FONTS_DIR_ENV: &str = "COUNTER_RITUAL_FONTS_DIR";

/// Environment variable overriding the Windows fonts directory.
pub const WINDOWS_FONTS_DIR_ENV: &str = "COUNTER_RITUAL_WINDOWS_FONTS_DIR";

const REQUIRED_STYLES: &[&str] = &["Regular", "Bold"];

const WINDOWS_FALLBACK_FAMILY_NAME: &str = "Myanmar Text";
const WINDOWS_REGULAR_FILE: &str = "mmrtext.ttf";
const WINDOWS_BOLD_FILE: &str = "mmrtextb.ttf";

fn font_file(directory: &Path, style: &str) -> PathBuf {
    directory.join(format!("{DEFAULT_FONT_FAMILY_NAME}-{style}.ttf"))
}

/// Location of the font directory shipped with the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            candidates.push(bin_dir.join("assets/fonts"));
        }
    }

    candidates.push(bundled_fonts_source_dir());
    candidates.dedup();
    candidates
}

fn missing_font_files(path: &Path) -> Vec<PathBuf> {
    REQUIRED_STYLES
        .iter()
        .map(|style| font_file(path, style))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            "directory missing".to_owned()
        } else {
            let missing_list = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{missing_list}]")
        };

        attempts.push(format!("{} ({reason})", candidate.display()));
    }

    Err(Error::new(
        format!(
            "no {DEFAULT_FONT_FAMILY_NAME} font directory found, checked: {}; set {FONTS_DIR_ENV}",
            attempts.join(", ")
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

fn load_font(path: &Path, style: &str) -> Result<FontData, Error> {
    FontData::load(path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::InvalidData
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!("failed to load {style} font {}: {err}", path.display()),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn load_optional_font(path: &Path, style: &str, fallback: &FontData) -> Result<FontData, Error> {
    if path.is_file() {
        load_font(path, style)
    } else {
        debug!("No {style} face at {}; reusing upright face", path.display());
        Ok(fallback.clone())
    }
}

fn load_bundled_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory()?;

    let regular = load_font(&font_file(&directory, "Regular"), "regular")?;
    let bold = load_font(&font_file(&directory, "Bold"), "bold")?;
    let italic = load_optional_font(&font_file(&directory, "Italic"), "italic", &regular)?;
    let bold_italic =
        load_optional_font(&font_file(&directory, "BoldItalic"), "bold italic", &bold)?;

    Ok(FontFamily {
        regular,
        bold,
        italic,
        bold_italic,
    })
}

fn windows_font_directory() -> Option<PathBuf> {
    if let Some(path) = env_path(WINDOWS_FONTS_DIR_ENV) {
        return Some(path);
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                let candidate = root.join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn windows_fallback_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = windows_font_directory().ok_or_else(|| {
        Error::new(
            "Windows font directory not found for fallback",
            io::Error::new(io::ErrorKind::NotFound, "windows fonts directory not found"),
        )
    })?;

    let regular = load_font(&directory.join(WINDOWS_REGULAR_FILE), "regular")?;
    let bold = load_font(&directory.join(WINDOWS_BOLD_FILE), "bold")?;

    Ok(FontFamily {
        italic: regular.clone(),
        bold_italic: bold.clone(),
        regular,
        bold,
    })
}

/// Returns `true` when `err` means the fonts are absent rather than broken.
pub fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Returns the default font family, falling back to the Windows "Myanmar Text" family
/// when the default files are missing.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    match load_bundled_font_family() {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => match windows_fallback_font_family() {
            Ok(fallback) => {
                warn!(
                    "{DEFAULT_FONT_FAMILY_NAME} unavailable ({err}); falling back to Windows '{WINDOWS_FALLBACK_FAMILY_NAME}' family."
                );
                Ok(fallback)
            }
            Err(fallback_err) => {
                debug!("Windows font fallback failed: {fallback_err}");
                Err(Error::new(
                    format!("{err}; Windows fallback failed: {fallback_err}"),
                    io::Error::new(io::ErrorKind::NotFound, "no usable font family"),
                ))
            }
        },
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_files_follow_family_naming() {
        let path = font_file(Path::new("/fonts"), "BoldItalic");
        assert_eq!(path, Path::new("/fonts/NotoSansMyanmar-BoldItalic.ttf"));
    }

    #[test]
    fn only_upright_faces_are_required() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(missing_font_files(dir.path()).len(), 2);

        std::fs::write(font_file(dir.path(), "Regular"), b"").expect("write");
        std::fs::write(font_file(dir.path(), "Bold"), b"").expect("write");
        assert!(missing_font_files(dir.path()).is_empty());
    }

    #[test]
    fn unreadable_font_is_not_reported_as_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").expect("write");

        let err = load_font(&path, "regular").unwrap_err();
        assert!(!fonts_missing(&err));
    }

    #[test]
    fn absent_font_is_reported_as_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_font(&dir.path().join("absent.ttf"), "regular").unwrap_err();
        assert!(fonts_missing(&err));
    }
}
