//! Fragment descriptors: where a recording's bytes live and where it lands.

use serde::{Deserialize, Serialize};

/// One recording to place in a mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentSpec {
    /// Stable recording id; orders fragments for [`mix_id`](crate::mix_id).
    #[serde(default)]
    pub recording_id: String,
    /// Segment the recording was made against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    /// Opaque storage key handed to the fetch collaborator.
    #[serde(alias = "objectKey", alias = "s3Key")]
    pub object_ref: String,
    #[serde(alias = "offset", alias = "offsetTime")]
    pub offset_seconds: f64,
    /// Rate the recording was captured at, as declared by the caller.
    #[serde(alias = "sampleRate", alias = "samplingRate")]
    pub native_sample_rate: u32,
}

impl FragmentSpec {
    pub fn new(
        object_ref: impl Into<String>,
        offset_seconds: f64,
        native_sample_rate: u32,
    ) -> Self {
        let object_ref = object_ref.into();
        Self {
            recording_id: object_ref.clone(),
            segment_id: None,
            object_ref,
            offset_seconds,
            native_sample_rate,
        }
    }

    pub fn with_recording_id(mut self, id: impl Into<String>) -> Self {
        self.recording_id = id.into();
        self
    }

    pub fn with_segment(mut self, segment_id: impl Into<String>) -> Self {
        self.segment_id = Some(segment_id.into());
        self
    }
}
