use crate::types::report::AttractivenessReport;

pub fn to_json(report: &AttractivenessReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
