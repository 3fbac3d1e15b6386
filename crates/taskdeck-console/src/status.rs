/*
[INPUT]:  Integer status codes and status display names
[OUTPUT]: Canonical status names and display tones
[POS]:    Status taxonomy shared by the engine and presentation
[UPDATE]: When the service adds a status
*/

pub use taskdeck_adapter::TaskStatus;

/// Display affordance for a status name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Queued,
    Running,
    Failed,
    Succeeded,
    Neutral,
}

pub fn status_name(code: i32) -> &'static str {
    TaskStatus::from_code(code).as_str()
}

/// `UNKNOWN` and anything unrecognised get the neutral tone.
pub fn display_class(name: &str) -> StatusTone {
    match name {
        "QUEUED" => StatusTone::Queued,
        "RUNNING" => StatusTone::Running,
        "FAILED" => StatusTone::Failed,
        "SUCCEEDED" => StatusTone::Succeeded,
        _ => StatusTone::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_name_is_total() {
        assert_eq!(status_name(0), "QUEUED");
        assert_eq!(status_name(1), "RUNNING");
        assert_eq!(status_name(2), "FAILED");
        assert_eq!(status_name(3), "SUCCEEDED");
        assert_eq!(status_name(4), "UNKNOWN");
        assert_eq!(status_name(99), "UNKNOWN");
        assert_eq!(status_name(-7), "UNKNOWN");
    }

    #[test]
    fn test_display_class_defaults_to_neutral() {
        assert_eq!(display_class("FAILED"), StatusTone::Failed);
        assert_eq!(display_class("SUCCEEDED"), StatusTone::Succeeded);
        assert_eq!(display_class("UNKNOWN"), StatusTone::Neutral);
        assert_eq!(display_class(""), StatusTone::Neutral);
        assert_eq!(display_class("failed"), StatusTone::Neutral);
    }
}
