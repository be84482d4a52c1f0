//! Recording ingest: validate an uploaded WAV and derive its identity.

use crate::error::{Error, Result};
use crate::store::{validate_key, PersistSink};
use reprise_codec::decode_wav;
use serde::Serialize;

/// Metadata for an accepted recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestedRecording {
    /// MD5 of the uploaded bytes, lowercase hex
    pub id: String,
    pub segment_id: String,
    /// Where the bytes belong in object storage
    pub key: String,
    pub duration_seconds: f64,
    /// Rate from the WAV header
    pub sample_rate: u32,
}

/// Storage key for a recording of a segment.
pub fn recording_key(segment_id: &str, recording_id: &str) -> String {
    format!("recordings/segment-{}/{}.wav", segment_id, recording_id)
}

/// Validate `bytes` as a decodable WAV and describe it.
pub fn ingest_recording(bytes: &[u8], segment_id: &str) -> Result<IngestedRecording> {
    if segment_id.is_empty() || segment_id.contains('/') {
        return Err(Error::InvalidConfig(format!(
            "segment id {:?} must be non-empty and contain no '/'",
            segment_id
        )));
    }

    let decoded = decode_wav(bytes)?;
    let id = format!("{:x}", md5::compute(bytes));
    let key = recording_key(segment_id, &id);
    validate_key(&key)?;

    let recording = IngestedRecording {
        id,
        segment_id: segment_id.to_string(),
        key,
        duration_seconds: decoded.duration_seconds(),
        sample_rate: decoded.sample_rate,
    };
    tracing::info!(
        id = %recording.id,
        segment = segment_id,
        duration_seconds = recording.duration_seconds,
        sample_rate = recording.sample_rate,
        "ingested recording"
    );
    Ok(recording)
}

/// [`ingest_recording`], then persist the bytes under the derived key.
pub fn ingest_and_store(
    bytes: &[u8],
    segment_id: &str,
    sink: &dyn PersistSink,
) -> Result<IngestedRecording> {
    let recording = ingest_recording(bytes, segment_id)?;
    sink.persist(&recording.key, bytes)?;
    Ok(recording)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FetchSource, MemoryStore};
    use reprise_codec::{encode_wav_mono_memory, BitDepth, WavConfig};

    fn wav(len: usize, rate: u32) -> Vec<u8> {
        encode_wav_mono_memory(&vec![0.25; len], &WavConfig::mono(rate, BitDepth::Int16)).unwrap()
    }

    #[test]
    fn test_ingest_metadata() {
        let bytes = wav(24000, 48000);
        let recording = ingest_recording(&bytes, "12").unwrap();
        assert_eq!(recording.id, format!("{:x}", md5::compute(&bytes)));
        assert_eq!(recording.sample_rate, 48000);
        assert!((recording.duration_seconds - 0.5).abs() < 1e-12);
        assert_eq!(
            recording.key,
            format!("recordings/segment-12/{}.wav", recording.id)
        );
    }

    #[test]
    fn test_same_bytes_same_id() {
        let a = ingest_recording(&wav(100, 44100), "s").unwrap();
        let b = ingest_recording(&wav(100, 44100), "s").unwrap();
        let c = ingest_recording(&wav(101, 44100), "s").unwrap();
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_rejects_non_wav() {
        assert!(matches!(
            ingest_recording(b"definitely not audio", "s"),
            Err(Error::Codec(_))
        ));
    }

    #[test]
    fn test_rejects_bad_segment_id() {
        assert!(ingest_recording(&wav(10, 44100), "").is_err());
        assert!(ingest_recording(&wav(10, 44100), "../x").is_err());
    }

    #[test]
    fn test_ingest_and_store() {
        let store = MemoryStore::new();
        let bytes = wav(10, 44100);
        let recording = ingest_and_store(&bytes, "7", &store).unwrap();
        assert_eq!(store.fetch(&recording.key).unwrap(), bytes);
    }
}
