// Threshold classification of the accumulated total

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ThresholdLevel {
    Ok,
    Warning,
    Critical,
}

/// Strict comparisons: a total equal to a threshold stays at the lower level.
pub fn classify(total: u64, warning: u64, critical: u64) -> ThresholdLevel {
    if total > critical {
        ThresholdLevel::Critical
    } else if total > warning {
        ThresholdLevel::Warning
    } else {
        ThresholdLevel::Ok
    }
}
