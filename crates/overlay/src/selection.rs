/// Metric + date pair driving overlay resolution.
///
/// Both parts must be present for anything to resolve; either being absent
/// means "no overlay".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OverlaySelection {
    pub metric: Option<String>,
    /// Date key in `YYYYMMDD` form.
    pub date: Option<String>,
}

impl OverlaySelection {
    pub fn new(metric: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            metric: Some(metric.into()),
            date: Some(date.into()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.metric.is_some() && self.date.is_some()
    }
}
