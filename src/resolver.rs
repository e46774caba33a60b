//! Resilient locator resolution
//!
//! Maps a logical UI target to a live element despite selector drift,
//! transient absence, or slow rendering. Descriptors are probed strictly in
//! order and the first success short-circuits; there is no scoring. The only
//! concurrency in the whole crate is [`resolve_any`], reserved for
//! interchangeable readiness signals where order carries no preference.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::engine::{DomProbe, ElementHandle};
use crate::errors::DrillError;
use crate::locator::{Descriptor, LocatorSet};

/// Outcome of a successful resolution
pub struct Resolution {
    /// Live handle to the matched element
    pub handle: Box<dyn ElementHandle>,
    /// Which descriptor in the set matched (0-based preference index)
    pub descriptor_index: usize,
    /// The descriptor that matched
    pub descriptor: Descriptor,
    /// Logical target name, carried for diagnostics
    pub target: String,
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolution")
            .field("handle", &self.handle.describe())
            .field("descriptor_index", &self.descriptor_index)
            .field("descriptor", &self.descriptor)
            .field("target", &self.target)
            .finish()
    }
}

/// Resolve a locator set to a live element
///
/// Each descriptor gets at most `per_descriptor_timeout`; when
/// `overall_timeout` is set, the per-probe budget is clamped to whatever
/// remains of it, and no probe is started once the overall budget is spent.
/// All-descriptors-exhausted returns [`DrillError::NotFound`] listing every
/// attempted descriptor.
pub async fn resolve(
    probe: &dyn DomProbe,
    set: &LocatorSet,
    per_descriptor_timeout: Duration,
    overall_timeout: Option<Duration>,
) -> Result<Resolution, DrillError> {
    let started = Instant::now();
    let mut attempted = Vec::new();

    for (descriptor_index, descriptor) in set.descriptors().iter().enumerate() {
        let budget = match overall_timeout {
            Some(overall) => {
                let remaining = overall.saturating_sub(started.elapsed());
                if remaining.is_zero() {
                    debug!(
                        "Overall budget spent resolving {}, skipping remaining descriptors",
                        set.target()
                    );
                    break;
                }
                per_descriptor_timeout.min(remaining)
            }
            None => per_descriptor_timeout,
        };

        debug!("Probing {} via {}", set.target(), descriptor);
        attempted.push(descriptor.clone());

        // The probe gets the budget as a hint, but the contract is enforced
        // here so a misbehaving engine cannot overrun it.
        match tokio::time::timeout(budget, probe.probe(descriptor, budget)).await {
            Ok(Ok(Some(handle))) => {
                info!("Found {} with {}", set.target(), descriptor);
                return Ok(Resolution {
                    handle,
                    descriptor_index,
                    descriptor: descriptor.clone(),
                    target: set.target().to_string(),
                });
            }
            Ok(Ok(None)) => {
                debug!("No match for {} via {}", set.target(), descriptor);
            }
            Ok(Err(e)) => {
                // An engine hiccup on one descriptor is treated as a miss so
                // the fallbacks still get their turn.
                warn!("Probe for {} via {} failed: {:#}", set.target(), descriptor, e);
            }
            Err(_) => {
                debug!("Probe for {} via {} timed out", set.target(), descriptor);
            }
        }
    }

    Err(DrillError::NotFound {
        target: set.target().to_string(),
        attempted,
    })
}

/// Race interchangeable descriptors, first successful probe wins
///
/// This is deliberately not a fallback chain: it is only correct when the
/// descriptors are equivalent, mutually exclusive signals (e.g. the three
/// "logged in" markers), so completion order carries no meaning. Losing
/// probes are aborted once a winner lands.
pub async fn resolve_any(
    probe: Arc<dyn DomProbe>,
    target: &str,
    descriptors: Vec<Descriptor>,
    timeout: Duration,
) -> Option<(Descriptor, Box<dyn ElementHandle>)> {
    let mut probes = JoinSet::new();
    for descriptor in descriptors {
        let probe = Arc::clone(&probe);
        probes.spawn(async move {
            match tokio::time::timeout(timeout, probe.probe(&descriptor, timeout)).await {
                Ok(Ok(Some(handle))) => Some((descriptor, handle)),
                Ok(Ok(None)) => None,
                Ok(Err(e)) => {
                    warn!("Readiness probe via {} failed: {:#}", descriptor, e);
                    None
                }
                Err(_) => None,
            }
        });
    }

    while let Some(joined) = probes.join_next().await {
        if let Ok(Some((descriptor, handle))) = joined {
            info!("{} signaled by {}", target, descriptor);
            probes.abort_all();
            return Some((descriptor, handle));
        }
    }

    debug!("No readiness signal for {} within {:?}", target, timeout);
    None
}
