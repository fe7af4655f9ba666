//! Font discovery for the layout engine.
//!
//! `genpdf` measures and embeds TrueType fonts, so every build needs a regular, bold, italic and
//! bold-italic face on disk.  The bundled Roboto family is searched first:
//!
//! 1. the directory named by `CHEAT_SHEET_FONTS_DIR`,
//! 2. `assets/fonts` next to the running executable,
//! 3. `assets/fonts` inside the crate manifest directory.
//!
//! When none of them has all four files, well-known system families are tried (Liberation Sans
//! on Linux, Arial on Windows).

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable overriding the bundled font directory.
pub const FONTS_DIR_ENV: &str = "CHEAT_SHEET_FONTS_DIR";

/// Environment variable overriding the Windows fonts directory used for the Arial fallback.
pub const WINDOWS_FONTS_DIR_ENV: &str = "CHEAT_SHEET_WINDOWS_FONTS_DIR";

/// File names of one font family, in regular, bold, italic, bold-italic order.
struct FamilyFiles {
    name: &'static str,
    files: [&'static str; 4],
}

impl FamilyFiles {
    fn missing_in(&self, directory: &Path) -> Vec<&'static str> {
        self.files
            .iter()
            .copied()
            .filter(|file| !directory.join(file).is_file())
            .collect()
    }

    fn load(&self, directory: &Path) -> Result<FontFamily<FontData>, Error> {
        let [regular, bold, italic, bold_italic] = self.files;
        Ok(FontFamily {
            regular: load_font(directory, regular)?,
            bold: load_font(directory, bold)?,
            italic: load_font(directory, italic)?,
            bold_italic: load_font(directory, bold_italic)?,
        })
    }
}

static BUNDLED: FamilyFiles = FamilyFiles {
    name: DEFAULT_FONT_FAMILY_NAME,
    files: [
        "Roboto-Regular.ttf",
        "Roboto-Bold.ttf",
        "Roboto-Italic.ttf",
        "Roboto-BoldItalic.ttf",
    ],
};

static LIBERATION_SANS: FamilyFiles = FamilyFiles {
    name: "Liberation Sans",
    files: [
        "LiberationSans-Regular.ttf",
        "LiberationSans-Bold.ttf",
        "LiberationSans-Italic.ttf",
        "LiberationSans-BoldItalic.ttf",
    ],
};

static ARIAL: FamilyFiles = FamilyFiles {
    name: "Arial",
    files: ["arial.ttf", "arialbd.ttf", "ariali.ttf", "arialbi.ttf"],
};

const LIBERATION_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
];

fn load_font(directory: &Path, file: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!("Failed to load font {}: {}", path.display(), err),
            io::Error::new(kind, err.to_string()),
        )
    })
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
}

/// Returns the `assets/fonts` directory inside the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn bundled_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    candidates.extend(env_path(FONTS_DIR_ENV));

    if let Some(bin_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(bin_dir.join("assets/fonts"));
    }

    candidates.push(bundled_fonts_source_dir());
    candidates.dedup();
    candidates
}

fn system_candidates() -> Vec<(&'static FamilyFiles, PathBuf)> {
    let mut candidates: Vec<_> = LIBERATION_DIRS
        .iter()
        .map(|dir| (&LIBERATION_SANS, PathBuf::from(dir)))
        .collect();

    if let Some(dir) = env_path(WINDOWS_FONTS_DIR_ENV) {
        candidates.push((&ARIAL, dir));
    }
    for var in ["WINDIR", "SystemRoot"] {
        if let Some(root) = env_path(var) {
            candidates.push((&ARIAL, root.join("Fonts")));
        }
    }

    candidates
}

fn locate_font_family() -> Result<(&'static FamilyFiles, PathBuf), Error> {
    let candidates = bundled_directory_candidates()
        .into_iter()
        .map(|dir| (&BUNDLED, dir))
        .chain(system_candidates());

    let mut attempts = Vec::new();
    for (family, directory) in candidates {
        let missing = family.missing_in(&directory);
        if missing.is_empty() {
            return Ok((family, directory));
        }

        let reason = if directory.is_dir() {
            format!("missing files [{}]", missing.join(", "))
        } else {
            "directory missing".to_owned()
        };
        debug!(
            "{} fonts not usable from {}: {}",
            family.name,
            directory.display(),
            reason
        );
        attempts.push(format!("{} ({})", directory.display(), reason));
    }

    Err(Error::new(
        format!(
            "Unable to locate a usable font family. Checked: {}. Copy the Roboto TTF files to assets/fonts or set {}.",
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

/// Loads the font family used for all text of a cheat sheet.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    let (family, directory) = locate_font_family()?;
    if family.name != DEFAULT_FONT_FAMILY_NAME {
        warn!(
            "Bundled {} fonts unavailable; falling back to system '{}' family from {}.",
            DEFAULT_FONT_FAMILY_NAME,
            family.name,
            directory.display()
        );
    }
    family.load(&directory)
}

/// Indicates whether a usable font family can be found on this machine.
pub fn default_fonts_available() -> bool {
    locate_font_family().is_ok()
}

/// Returns whether an error from [`default_font_family`] means fonts are absent rather than
/// broken.
pub fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err) if io_err.kind() == io::ErrorKind::NotFound
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_are_listed() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("Roboto-Bold.ttf"), b"").expect("write stub");

        let missing = BUNDLED.missing_in(dir.path());
        assert_eq!(
            missing,
            ["Roboto-Regular.ttf", "Roboto-Italic.ttf", "Roboto-BoldItalic.ttf"]
        );
    }

    #[test]
    fn manifest_directory_is_always_a_candidate() {
        assert!(bundled_directory_candidates().contains(&bundled_fonts_source_dir()));
    }
}
