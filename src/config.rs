use serde::{Deserialize, Serialize};

/// Options recognized by [`FrameBuffer`](crate::buffer::FrameBuffer).
///
/// Field names follow the host option bag, so
/// `{"usePoster": true, "disableSeekBuffering": false}` deserializes as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BufferConfig {
    /// Draw the source's poster image while no frame is decodable.
    pub use_poster: bool,

    /// Redraw on every query, even when the playback time has not moved.
    #[serde(alias = "disableSeekGuard")]
    pub disable_seek_buffering: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_host_options() {
        let config: BufferConfig =
            serde_json::from_str(r#"{"usePoster": true, "disableSeekBuffering": true}"#).unwrap();
        assert!(config.use_poster);
        assert!(config.disable_seek_buffering);
    }

    #[test]
    fn missing_fields_default_off() {
        let config: BufferConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BufferConfig::default());

        let config: BufferConfig = serde_json::from_str(r#"{"usePoster": true}"#).unwrap();
        assert!(config.use_poster);
        assert!(!config.disable_seek_buffering);
    }
}
