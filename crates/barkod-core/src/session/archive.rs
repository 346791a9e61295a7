//! ZIP packaging of every renderable code.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::barcode::{BarcodeRenderer, Symbology};
use crate::error::ArchiveError;
use crate::models::bundle::ExtractionGroup;

/// A finished archive held in memory.
#[derive(Debug, Clone)]
pub struct Archive {
    bytes: Vec<u8>,
    entries: Vec<String>,
    skipped: usize,
}

impl Archive {
    /// ZIP file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into the ZIP file contents.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Entry names in write order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Codes that produced no entry.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Group name as used in file names: periods removed, spaces to underscores.
pub fn sanitize_group_name(name: &str) -> String {
    name.replace('.', "").replace(' ', "_")
}

/// File name of one code inside the archive.
pub fn entry_name(group_name: &str, code: &str) -> String {
    format!(
        "{}_{}.png",
        strip_separators(&sanitize_group_name(group_name)),
        strip_separators(code)
    )
}

/// File name for a code rendered on its own.
pub fn code_file_name(code: &str) -> String {
    format!("{}.png", strip_separators(code))
}

/// Codes come from model output; a separator must never become a directory.
fn strip_separators(part: &str) -> String {
    part.replace(['/', '\\'], "_")
}

/// Render every code of every group and pack the images into a ZIP.
///
/// Codes that fail to render are left out. A code repeated inside the same
/// group maps to the same entry name and is written once.
pub fn build_archive<S: Symbology>(
    groups: &[ExtractionGroup],
    renderer: &BarcodeRenderer<S>,
) -> Result<Archive, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped = 0;

    for group in groups {
        for code in &group.codes {
            let Some(rendered) = renderer.render(code) else {
                skipped += 1;
                continue;
            };

            let name = entry_name(&group.name, code);
            if !seen.insert(name.clone()) {
                warn!("Duplicate archive entry {}, keeping the first", name);
                skipped += 1;
                continue;
            }

            writer.start_file(name.as_str(), options)?;
            writer.write_all(rendered.png())?;
            entries.push(name);
        }
    }

    let bytes = writer.finish()?.into_inner();
    debug!(
        "Archive has {} entries ({} codes skipped, {} bytes)",
        entries.len(),
        skipped,
        bytes.len()
    );

    Ok(Archive {
        bytes,
        entries,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::ModuleGrid;
    use crate::error::RenderError;
    use crate::models::config::BarcodeConfig;
    use pretty_assertions::assert_eq;
    use zip::ZipArchive;

    /// Accepts anything without a '!' and draws a tiny fixed symbol.
    struct Bangless;

    impl Symbology for Bangless {
        fn encode(&self, code: &str) -> crate::barcode::Result<ModuleGrid> {
            if code.contains('!') {
                return Err(RenderError::Encode {
                    code: code.to_string(),
                    reason: "unsupported".to_string(),
                });
            }
            ModuleGrid::new(vec![vec![true, false, true]])
        }
    }

    fn renderer() -> BarcodeRenderer<Bangless> {
        BarcodeRenderer::with_symbology(
            Bangless,
            BarcodeConfig {
                columns: 1,
                security_level: 0,
                scale: 1,
                ratio: 1,
                quiet_zone: 1,
                border: 1,
            },
        )
    }

    fn group(name: &str, codes: &[&str]) -> ExtractionGroup {
        ExtractionGroup::new(name, codes.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_sanitize_group_name() {
        assert_eq!(sanitize_group_name("1. BAĞ"), "1_BAĞ");
        assert_eq!(sanitize_group_name("Paket 2.1 A"), "Paket_21_A");
        assert_eq!(entry_name("2. BAĞ", "EA555"), "2_BAĞ_EA555.png");
    }

    #[test]
    fn test_separators_never_reach_file_names() {
        assert_eq!(entry_name("1. BAĞ", "DT123/1"), "1_BAĞ_DT123_1.png");
        assert_eq!(entry_name("A/B", "..\\x"), "A_B_.._x.png");
        assert_eq!(code_file_name("DT123/../1"), "DT123_.._1.png");
    }

    #[test]
    fn test_only_rendered_codes_are_packed() {
        let groups = vec![
            group("1. BAĞ", &["DT123", "BAD!"]),
            group("2. BAĞ", &["EA555"]),
            group("3. BAĞ", &["!!"]),
        ];

        let archive = build_archive(&groups, &renderer()).unwrap();

        assert_eq!(archive.entries(), &["1_BAĞ_DT123.png", "2_BAĞ_EA555.png"]);
        assert_eq!(archive.skipped(), 2);

        let mut zip = ZipArchive::new(Cursor::new(archive.bytes().to_vec())).unwrap();
        assert_eq!(zip.len(), 2);

        let expected = renderer().render("EA555").unwrap();
        let mut entry = zip.by_name("2_BAĞ_EA555.png").unwrap();
        let mut data = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut data).unwrap();
        assert_eq!(data, expected.png());
    }

    #[test]
    fn test_same_code_in_two_groups_gets_two_entries() {
        let groups = vec![group("1. BAĞ", &["DT1"]), group("2. BAĞ", &["DT1"])];
        let archive = build_archive(&groups, &renderer()).unwrap();
        assert_eq!(archive.entries().len(), 2);
    }

    #[test]
    fn test_repeated_entry_name_written_once() {
        let groups = vec![group("1. BAĞ", &["DT1", "DT1"])];
        let archive = build_archive(&groups, &renderer()).unwrap();
        assert_eq!(archive.entries(), &["1_BAĞ_DT1.png"]);
        assert_eq!(archive.skipped(), 1);
    }

    #[test]
    fn test_empty_groups_give_empty_archive() {
        let archive = build_archive(&[], &renderer()).unwrap();
        let zip = ZipArchive::new(Cursor::new(archive.into_bytes())).unwrap();
        assert_eq!(zip.len(), 0);
    }
}
