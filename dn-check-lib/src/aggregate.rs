//! Result aggregation for a run.
//!
//! The aggregator is seeded with every name before the first probe is
//! dispatched, so names whose probes all failed still show up in the final
//! [`ResultSet`]. It is owned by the scheduler's collection loop, which is the
//! only place verdicts are delivered from.

use crate::error::DnCheckError;
use crate::types::{NameResult, ProbeRequest, ResultSet, TldVerdict};
use crate::utils::is_blank;
use std::collections::HashMap;

#[derive(Debug)]
struct Entry {
    name: String,
    /// Verdicts tagged with the TLD's input position, in arrival order
    verdicts: Vec<(usize, TldVerdict)>,
}

/// Collects per-pair verdicts into per-name results.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    delivered: usize,
}

impl ResultAggregator {
    /// Seed the aggregator with the run's names.
    ///
    /// Blank names are skipped and repeated names keep their first position.
    pub fn seeded<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut aggregator = Self::default();
        for name in names {
            let name = name.as_ref();
            if is_blank(name) || aggregator.index.contains_key(name) {
                continue;
            }
            aggregator.index.insert(name.to_string(), aggregator.entries.len());
            aggregator.entries.push(Entry {
                name: name.to_string(),
                verdicts: Vec::new(),
            });
        }
        aggregator
    }

    /// Record the result of one probe.
    ///
    /// `None` means the probe failed transiently; it is counted as delivered
    /// but adds no verdict.
    pub fn accumulate(
        &mut self,
        request: &ProbeRequest,
        verdict: Option<TldVerdict>,
    ) -> Result<(), DnCheckError> {
        let slot = *self.index.get(&request.name).ok_or_else(|| {
            DnCheckError::internal(format!(
                "verdict delivered for unknown name '{}'",
                request.name
            ))
        })?;

        self.delivered += 1;
        if let Some(verdict) = verdict {
            self.entries[slot].verdicts.push((request.tld_index, verdict));
        }
        Ok(())
    }

    /// Number of probe results delivered so far, including failed ones.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Number of distinct names being tracked.
    pub fn name_count(&self) -> usize {
        self.entries.len()
    }

    /// Build the final result set.
    ///
    /// Verdicts are ordered by the TLD's position in the input list, so the
    /// output does not depend on completion order. Calling this twice on the
    /// same accumulation gives identical results.
    pub fn finalize(&self) -> ResultSet {
        let names = self
            .entries
            .iter()
            .map(|entry| {
                let mut tagged = entry.verdicts.clone();
                tagged.sort_by_key(|(tld_index, verdict)| (*tld_index, verdict.available));
                NameResult {
                    name: entry.name.clone(),
                    verdicts: tagged.into_iter().map(|(_, verdict)| verdict).collect(),
                }
            })
            .collect();

        ResultSet::from_results(names)
    }
}
