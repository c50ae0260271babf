use crate::config::FileNameConfig;
use coverpress_types::CoverRecord;

/// Builds `{prefix}_{stem}_{course}_{submitter}.{ext}` for a record.
pub fn derive_file_name(record: &CoverRecord, naming: &FileNameConfig) -> String {
    let course = record
        .course_code_token()
        .unwrap_or(naming.course_placeholder.as_str());
    let submitter = record
        .submitter_token()
        .unwrap_or_else(|| naming.submitter_placeholder.clone());
    format!(
        "{}_{}_{}_{}.{}",
        naming.prefix, naming.stem, course, submitter, naming.extension
    )
}
