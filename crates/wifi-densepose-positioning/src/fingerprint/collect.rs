//! Building averaged fingerprints from repeated scans.

use chrono::{DateTime, Utc};

use crate::domain::reading::RssiSignature;
use crate::error::PositioningResult;
use crate::fingerprint::record::FingerprintRecord;
use crate::fingerprint::store::FingerprintStore;
use crate::port::ScanPort;

/// Rank-wise mean of `samples`, rounded to whole dBm.
///
/// Rank `i` averages only the samples that reached rank `i`, so a short
/// scan does not drag down the ranks it lacks. The result is as long as the
/// longest sample. Returns `None` when every sample is empty.
pub fn average_signatures(samples: &[RssiSignature]) -> Option<RssiSignature> {
    let longest = samples.iter().map(RssiSignature::len).max().unwrap_or(0);
    if longest == 0 {
        return None;
    }

    let averaged = (0..longest)
        .map(|rank| {
            let (sum, n) = samples
                .iter()
                .filter_map(|s| s.values().get(rank))
                .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
            (sum / n as f64).round()
        })
        .collect();
    Some(RssiSignature::new(averaged))
}

/// Take `samples` signature scans of the `top_n` strongest transmitters and
/// store their average under `label`.
///
/// Failed and empty scans are skipped. Returns `Ok(None)`, leaving the
/// store untouched, when no scan produced a value.
pub fn collect_fingerprint<S>(
    scanner: &S,
    store: &FingerprintStore,
    label: &str,
    samples: usize,
    top_n: usize,
    collected_at: DateTime<Utc>,
) -> PositioningResult<Option<FingerprintRecord>>
where
    S: ScanPort + ?Sized,
{
    let mut scans = Vec::with_capacity(samples);
    for attempt in 0..samples {
        match scanner.signature(top_n) {
            Ok(signature) if !signature.is_empty() => scans.push(signature),
            Ok(_) => tracing::debug!(attempt, label, "empty scan skipped"),
            Err(error) => tracing::warn!(attempt, label, %error, "scan failed, skipping sample"),
        }
    }

    let record = store.add(label, &scans, collected_at)?;
    match &record {
        Some(r) => tracing::info!(
            label,
            samples = r.samples,
            ranks = r.signature.len(),
            "fingerprint collected"
        ),
        None => tracing::warn!(label, requested = samples, "no usable scans, fingerprint not stored"),
    }
    Ok(record)
}
