//! Content-addressed mix identifiers.

use crate::error::Result;
use crate::fragment::FragmentSpec;
use crate::options::MixOptions;
use reprise_codec::{BitDepth, OutputFormat};
use reprise_core::{MixConfig, SilencePolicy, TrimMode};
use serde::Serialize;

/// Everything besides the fragments that changes the rendered samples.
///
/// The output format is not part of it; it is carried by the key's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixVariant {
    pub sample_rate: u32,
    pub trim: TrimMode,
    pub silence: SilencePolicy,
    pub normalize: bool,
    pub bit_depth: BitDepth,
}

impl MixVariant {
    pub fn new(config: &MixConfig, options: &MixOptions) -> Self {
        Self {
            sample_rate: config.sample_rate,
            trim: config.trim,
            silence: config.silence,
            normalize: options.normalize,
            bit_depth: options.bit_depth,
        }
    }
}

#[derive(Serialize)]
struct Canonical<'a> {
    recordings: Vec<&'a FragmentSpec>,
    variant: &'a MixVariant,
}

/// Identifier for a set of fragments rendered as `variant`, independent of
/// fragment order.
///
/// The fragments are sorted by recording id, serialized as JSON together
/// with the variant and hashed with MD5 (lowercase hex).
pub fn mix_id(fragments: &[FragmentSpec], variant: &MixVariant) -> Result<String> {
    let mut recordings: Vec<&FragmentSpec> = fragments.iter().collect();
    recordings.sort_by(|a, b| {
        a.recording_id
            .cmp(&b.recording_id)
            .then_with(|| a.object_ref.cmp(&b.object_ref))
            .then_with(|| a.offset_seconds.total_cmp(&b.offset_seconds))
    });

    let canonical = serde_json::to_vec(&Canonical {
        recordings,
        variant,
    })?;
    Ok(format!("{:x}", md5::compute(canonical)))
}

/// Storage key of a finished mix.
pub fn mix_key(mix_id: &str, format: OutputFormat) -> String {
    format!("mixes/{}.{}", mix_id, format.extension())
}
