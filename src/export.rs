use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::browser::Locator;

/// Base URL for the site's direct per-project download endpoints
pub const EXPORT_BASE: &str = "https://instagantt.com/projects";

/// How long a dialog needs to finish its fade animation after closing
pub const DIALOG_FADE: std::time::Duration = std::time::Duration::from_secs(1);

/// Stages of one export dialog sequence.
///
/// Each transition is gated by a wait-for-clickable capability on the
/// browser surface; the sequence itself carries no timing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    MenuOpened,
    DialogOpened,
    Generating,
    Ready,
    Downloaded,
    Closed,
}

/// A `<select>` the dialog needs configured before generating
#[derive(Debug, Clone, Copy)]
pub struct OptionSelect {
    pub select: Locator<'static>,
    pub value: &'static str,
}

/// Everything that differs between the image and spreadsheet export dialogs
#[derive(Debug, Clone, Copy)]
pub struct ExportSpec {
    pub label: &'static str,
    /// "Export & Share" menu toggle
    pub menu: Locator<'static>,
    /// Menu entry that opens this dialog
    pub entry: Locator<'static>,
    /// Option to configure before generating, if any
    pub configure: Option<OptionSelect>,
    /// "Generate" button inside the dialog
    pub generate: Locator<'static>,
    /// Whether generate needs its own clickability wait before the click
    pub wait_for_generate: bool,
    /// Button that appears once the artifact is ready to download
    pub ready: Locator<'static>,
    /// Dialog close control
    pub close: Locator<'static>,
    /// Path suffix of the direct download endpoint
    pub url_suffix: &'static str,
    pub file_prefix: &'static str,
    pub file_ext: &'static str,
}

pub const IMAGE_EXPORT: ExportSpec = ExportSpec {
    label: "image",
    menu: Locator::ClassName("dropdown-toggle"),
    entry: Locator::ClassName("export-image"),
    configure: None,
    generate: Locator::XPath(
        r#"//*[@id="image-export-modal"]/div[2]/div[1]/table/tbody/tr[4]/td[2]/button"#,
    ),
    wait_for_generate: true,
    ready: Locator::XPath(r#"//*[@id="image-export-modal"]/div[2]/div[3]/button"#),
    close: Locator::XPath(r#"//*[@id="image-export-modal"]/div[3]/a"#),
    url_suffix: "image?download=now",
    file_prefix: "saved_image",
    file_ext: "jpg",
};

pub const SPREADSHEET_EXPORT: ExportSpec = ExportSpec {
    label: "spreadsheet",
    menu: Locator::ClassName("dropdown-toggle"),
    entry: Locator::ClassName("export-spreadsheet"),
    configure: Some(OptionSelect {
        select: Locator::ClassName("day-format"),
        value: "DD/MM/YYYY",
    }),
    generate: Locator::XPath(
        r#"//*[@id="xls-export-modal"]/div[2]/div[1]/table/tbody/tr[2]/td[2]/button"#,
    ),
    wait_for_generate: false,
    ready: Locator::XPath(r#"//*[@id="xls-export-modal"]/div[2]/div[3]/button"#),
    close: Locator::XPath(r#"//*[@id="xls-export-modal"]/div[3]/a"#),
    url_suffix: "xls",
    file_prefix: "saved_spreadsheet",
    file_ext: "xlsx",
};

/// URL path segment for a project: everything after the first hyphen of the
/// DOM identifier, or the identifier unchanged if it has none.
pub fn project_key(project_id: &str) -> &str {
    match project_id.find('-') {
        Some(idx) => &project_id[idx + 1..],
        None => project_id,
    }
}

/// Direct download endpoint for the current project
pub fn download_url(project_id: &str, url_suffix: &str) -> String {
    format!("{EXPORT_BASE}/{}/{url_suffix}", project_key(project_id))
}

/// Destination path for an exported artifact, stamped with local time
pub fn artifact_path(
    save_path: &Path,
    spec: &ExportSpec,
    at: DateTime<Local>,
) -> PathBuf {
    let stamp = at.format("%Y-%m-%d %H-%M");
    save_path.join(format!("{} {stamp}.{}", spec.file_prefix, spec.file_ext))
}
