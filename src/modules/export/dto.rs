use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// Framerate used when the caller does not supply a target duration.
pub const DEFAULT_FRAMERATE: f64 = 25.0;

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct AsyncExportParams {
    /// Bucket containing the source images.
    #[validate(length(min = 1, message = "input_bucket must not be empty"))]
    pub input_bucket: String,
    /// Bucket the finished timelapse is written to.
    #[validate(length(min = 1, message = "output_bucket must not be empty"))]
    pub output_bucket: String,
    /// Object name for the finished timelapse.
    #[validate(length(min = 1, message = "timelapse_name must not be empty"))]
    pub timelapse_name: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct SyncExportParams {
    /// Bucket containing the source images.
    #[validate(length(min = 1, message = "input_bucket must not be empty"))]
    pub input_bucket: String,
    /// Desired output duration in milliseconds.
    #[validate(range(min = 1, message = "duration must be a positive number of milliseconds"))]
    pub duration: i64,
}

/// Splits a request body into frame object ids, one per line. Surrounding
/// whitespace and blank lines are dropped; order is preserved.
pub fn parse_frame_list(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Framerate that spreads `frame_count` frames over `duration_ms`.
pub fn framerate_for(frame_count: usize, duration_ms: i64) -> f64 {
    frame_count as f64 / (duration_ms as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_list_preserves_order_and_skips_blanks() {
        let body = "frame_001.jpg\n\n  frame_002.jpg  \r\nframe_003.jpg\n\n";
        assert_eq!(
            parse_frame_list(body),
            vec!["frame_001.jpg", "frame_002.jpg", "frame_003.jpg"]
        );
    }

    #[test]
    fn frame_list_of_blank_body_is_empty() {
        assert!(parse_frame_list("").is_empty());
        assert!(parse_frame_list("\n \n\t\n").is_empty());
    }

    #[test]
    fn framerate_spreads_frames_over_duration() {
        assert_eq!(framerate_for(50, 2000), 25.0);
        assert_eq!(framerate_for(10, 1000), 10.0);
        assert_eq!(framerate_for(1, 4000), 0.25);
    }
}
