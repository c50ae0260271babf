use coverpress_traits::MIN_CAPTURE_SCALE;
use coverpress_types::{PageFormat, PageLayout};
use serde::{Deserialize, Serialize};

/// Settings for one pipeline. Every field has a default, so a partial
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// Physical format of the cover page.
    pub page_format: PageFormat,
    /// Oversampling factor for captures; values below 3 are raised to 3.
    pub capture_scale: f32,
    /// Whether cross-origin images may be loaded while capturing.
    pub allow_cross_origin: bool,
    /// Margins and break search used when paginating converted Word
    /// documents. Its format is replaced by `page_format` so converted pages
    /// match the cover; see [`PipelineConfig::conversion_layout`].
    pub print_layout: PageLayout,
    pub file_naming: FileNameConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_format: PageFormat::A4,
            capture_scale: MIN_CAPTURE_SCALE,
            allow_cross_origin: true,
            print_layout: PageLayout::default(),
            file_naming: FileNameConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn effective_capture_scale(&self) -> f32 {
        if self.capture_scale.is_finite() {
            self.capture_scale.max(MIN_CAPTURE_SCALE)
        } else {
            MIN_CAPTURE_SCALE
        }
    }

    /// The layout converted documents are paginated with.
    pub fn conversion_layout(&self) -> PageLayout {
        PageLayout {
            format: self.page_format,
            ..self.print_layout
        }
    }
}

/// Parts of the output file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileNameConfig {
    pub prefix: String,
    pub stem: String,
    pub extension: String,
    /// Used when the course has no code in front of its title separator.
    pub course_placeholder: String,
    /// Used when the submitter name is blank.
    pub submitter_placeholder: String,
}

impl Default for FileNameConfig {
    fn default() -> Self {
        Self {
            prefix: "UIU".to_string(),
            stem: "Assignment".to_string(),
            extension: "pdf".to_string(),
            course_placeholder: "COURSE".to_string(),
            submitter_placeholder: "Student".to_string(),
        }
    }
}
