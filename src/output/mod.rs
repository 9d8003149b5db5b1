mod markdown;

pub(crate) use markdown::{ReportMeta, render_report};
