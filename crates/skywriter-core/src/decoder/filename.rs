use std::path::Path;

/// File extensions used for raw amiibo dumps, without the leading dot.
pub const DUMP_EXTENSIONS: &[&str] = &["bin", "nfc"];

/// Returns `true` if `path` has a known dump extension (ASCII case-insensitive).
#[must_use]
pub fn is_dump_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| DUMP_EXTENSIONS.iter().any(|d| ext.eq_ignore_ascii_case(d)))
}

/// Derives a display name from a dump file name.
///
/// Strips one trailing dump extension; everything else, including case,
/// is preserved.
#[must_use]
pub fn display_name(filename: &str) -> &str {
    for ext in DUMP_EXTENSIONS {
        let Some(dot) = filename.len().checked_sub(ext.len() + 1) else {
            continue;
        };
        let Some(tail) = filename.get(dot..) else {
            continue;
        };
        if tail.starts_with('.') && tail[1..].eq_ignore_ascii_case(ext) {
            return &filename[..dot];
        }
    }
    filename
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_dump_extensions() {
        assert_eq!(display_name("Mario.bin"), "Mario");
        assert_eq!(display_name("Wolf Link.nfc"), "Wolf Link");
        assert_eq!(display_name("Qbby.BIN"), "Qbby");
    }

    #[test]
    fn display_name_preserves_case_and_inner_dots() {
        assert_eq!(
            display_name("Dr. Mario (Super Smash Bros.).bin"),
            "Dr. Mario (Super Smash Bros.)"
        );
        assert_eq!(display_name("R.O.B. - Famicom.nfc"), "R.O.B. - Famicom");
    }

    #[test]
    fn display_name_leaves_other_names_alone() {
        assert_eq!(display_name("Mario.json"), "Mario.json");
        assert_eq!(display_name("bin"), "bin");
        assert_eq!(display_name(".bin"), "");
        assert_eq!(display_name("Ness"), "Ness");
        assert_eq!(display_name("Pokémon Trainer.bin"), "Pokémon Trainer");
    }

    #[test]
    fn dump_file_detection() {
        assert!(is_dump_file(Path::new("dumps/Mario.bin")));
        assert!(is_dump_file(Path::new("Mario.NFC")));
        assert!(!is_dump_file(Path::new("Mario.json")));
        assert!(!is_dump_file(Path::new("README")));
    }
}
