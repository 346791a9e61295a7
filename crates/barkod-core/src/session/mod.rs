//! Interactive session state: current outcome, selected group, previews and
//! the bulk download.

mod archive;

pub use archive::{build_archive, code_file_name, entry_name, sanitize_group_name, Archive};

use crate::barcode::{BarcodeRenderer, Pdf417, RenderedCode, Symbology};
use crate::error::ArchiveError;
use crate::models::bundle::{ExtractionGroup, ExtractionOutcome};

/// Label of the button that selects a group.
///
/// A single-code group shows the code itself, anything else the count.
pub fn button_label(group: &ExtractionGroup) -> String {
    match group.codes.as_slice() {
        [code] => format!("📦 {} - {}", group.name, code),
        codes => format!("📦 {} ({} Barkod)", group.name, codes.len()),
    }
}

/// One selectable group as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupButton {
    /// Position of the group in the outcome.
    pub index: usize,
    /// Button text.
    pub label: String,
    /// Whether this is the current selection.
    pub selected: bool,
}

/// One code of the selected group; the image is missing if rendering failed.
#[derive(Debug, Clone)]
pub struct PreviewItem {
    pub code: String,
    pub image: Option<RenderedCode>,
}

/// State of one interactive session. Nothing here outlives the process.
#[derive(Debug)]
pub struct Session<S = Pdf417> {
    renderer: BarcodeRenderer<S>,
    outcome: Option<ExtractionOutcome>,
    selected: Option<usize>,
}

impl<S: Symbology> Session<S> {
    /// Start an empty session.
    pub fn new(renderer: BarcodeRenderer<S>) -> Self {
        Self {
            renderer,
            outcome: None,
            selected: None,
        }
    }

    /// Replace the current outcome. Clears the selection.
    pub fn load(&mut self, outcome: ExtractionOutcome) {
        self.outcome = Some(outcome);
        self.selected = None;
    }

    /// Current outcome, if a document has been processed.
    pub fn outcome(&self) -> Option<&ExtractionOutcome> {
        self.outcome.as_ref()
    }

    /// Groups of the current outcome.
    pub fn groups(&self) -> &[ExtractionGroup] {
        self.outcome.as_ref().map(|o| o.groups()).unwrap_or(&[])
    }

    /// The renderer used for previews and the archive.
    pub fn renderer(&self) -> &BarcodeRenderer<S> {
        &self.renderer
    }

    /// One button per group, in extraction order.
    pub fn buttons(&self) -> Vec<GroupButton> {
        self.groups()
            .iter()
            .enumerate()
            .map(|(index, group)| GroupButton {
                index,
                label: button_label(group),
                selected: self.selected == Some(index),
            })
            .collect()
    }

    /// Select a group by position. Out-of-range indexes leave the selection
    /// unchanged and return `None`.
    pub fn select(&mut self, index: usize) -> Option<&ExtractionGroup> {
        if index >= self.groups().len() {
            return None;
        }
        self.selected = Some(index);
        self.groups().get(index)
    }

    /// Currently selected group.
    pub fn selected_group(&self) -> Option<&ExtractionGroup> {
        self.selected.and_then(|i| self.groups().get(i))
    }

    /// Render every code of the selected group, freshly on each call.
    pub fn preview(&self) -> Vec<PreviewItem> {
        let Some(group) = self.selected_group() else {
            return Vec::new();
        };

        group
            .codes
            .iter()
            .map(|code| PreviewItem {
                code: code.clone(),
                image: self.renderer.render(code),
            })
            .collect()
    }

    /// Build the bulk download over all groups.
    pub fn archive(&self) -> Result<Archive, ArchiveError> {
        build_archive(self.groups(), &self.renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::ModuleGrid;
    use crate::error::RenderError;
    use crate::models::config::BarcodeConfig;
    use pretty_assertions::assert_eq;

    struct Bangless;

    impl Symbology for Bangless {
        fn encode(&self, code: &str) -> crate::barcode::Result<ModuleGrid> {
            if code.contains('!') {
                return Err(RenderError::Encode {
                    code: code.to_string(),
                    reason: "unsupported".to_string(),
                });
            }
            ModuleGrid::new(vec![vec![true, false]])
        }
    }

    fn session() -> Session<Bangless> {
        let mut session = Session::new(BarcodeRenderer::with_symbology(
            Bangless,
            BarcodeConfig::default(),
        ));
        session.load(ExtractionOutcome::succeeded(
            "gemini-2.5-flash",
            vec![
                ExtractionGroup::new("1. BAĞ", vec!["DT123".into(), "DT!".into()]),
                ExtractionGroup::new("2. BAĞ", vec!["EA555".into()]),
                ExtractionGroup::new("3. BAĞ", vec![]),
            ],
            vec![],
        ));
        session
    }

    #[test]
    fn test_button_labels() {
        let labels: Vec<String> = session().buttons().into_iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            vec![
                "📦 1. BAĞ (2 Barkod)",
                "📦 2. BAĞ - EA555",
                "📦 3. BAĞ (0 Barkod)",
            ]
        );
    }

    #[test]
    fn test_selection_marks_button() {
        let mut session = session();
        assert!(session.buttons().iter().all(|b| !b.selected));

        let group = session.select(1).unwrap();
        assert_eq!(group.name, "2. BAĞ");

        let selected: Vec<bool> = session.buttons().iter().map(|b| b.selected).collect();
        assert_eq!(selected, vec![false, true, false]);
    }

    #[test]
    fn test_out_of_range_selection_is_ignored() {
        let mut session = session();
        session.select(0);
        assert!(session.select(7).is_none());
        assert_eq!(session.selected_group().unwrap().name, "1. BAĞ");
    }

    #[test]
    fn test_preview_keeps_codes_without_images() {
        let mut session = session();
        assert!(session.preview().is_empty());

        session.select(0);
        let preview = session.preview();
        assert_eq!(preview.len(), 2);
        assert_eq!(preview[0].code, "DT123");
        assert!(preview[0].image.is_some());
        assert_eq!(preview[1].code, "DT!");
        assert!(preview[1].image.is_none());
    }

    #[test]
    fn test_load_resets_selection() {
        let mut session = session();
        session.select(1);
        session.load(ExtractionOutcome::failed(vec![]));
        assert!(session.selected_group().is_none());
        assert!(session.buttons().is_empty());
    }

    #[test]
    fn test_archive_covers_all_groups() {
        let archive = session().archive().unwrap();
        assert_eq!(archive.entries(), &["1_BAĞ_DT123.png", "2_BAĞ_EA555.png"]);
    }
}
