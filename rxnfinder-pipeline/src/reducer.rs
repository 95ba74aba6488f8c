//! Alignment hit reduction
//!
//! Turns a stream of alignment records into a short, ranked list with one entry
//! per target gene. The pass is single and streaming: memory grows with the
//! number of distinct target genes, not with the number of records.

use indexmap::map::Entry;
use indexmap::IndexMap;
use rxnfinder_core::config::SearchConfig;
use rxnfinder_core::{AlignmentRecord, RankedHit, RxnFinderResult};
use rxnfinder_tools::AlignmentOutput;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::{debug, warn};

/// Score floor and report size for one reduction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReducer {
    noise_floor: f64,
    top_n: usize,
}

impl HitReducer {
    pub fn new(noise_floor: f64, top_n: usize) -> Self {
        Self { noise_floor, top_n }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.blast_score_floor, config.number_of_hits_to_report)
    }

    pub fn noise_floor(&self) -> f64 {
        self.noise_floor
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Start an incremental reduction for `reaction_id`
    pub fn accumulator(&self, reaction_id: &str) -> HitAccumulator {
        HitAccumulator {
            reaction_id: reaction_id.to_string(),
            noise_floor: self.noise_floor,
            top_n: self.top_n,
            genes: IndexMap::new(),
            seen: 0,
            below_floor: 0,
        }
    }

    /// Reduce a whole record sequence at once
    pub fn reduce<I>(&self, records: I, reaction_id: &str) -> Vec<RankedHit>
    where
        I: IntoIterator<Item = AlignmentRecord>,
    {
        let mut acc = self.accumulator(reaction_id);
        for record in records {
            acc.push(record);
        }
        acc.finish()
    }

    /// Reduce raw tabular output, skipping rows that do not parse.
    ///
    /// Blocking: reads the whole output.
    pub fn reduce_output(
        &self,
        output: &AlignmentOutput,
        reaction_id: &str,
    ) -> RxnFinderResult<Vec<RankedHit>> {
        let mut rows = output.records()?.skip_malformed();
        let mut acc = self.accumulator(reaction_id);
        for record in rows.by_ref() {
            acc.push(record);
        }

        let skipped = rows.finish()?;
        if skipped > 0 {
            warn!("{}: skipped {} malformed alignment rows", reaction_id, skipped);
        }
        Ok(acc.finish())
    }
}

#[derive(Debug)]
struct GeneTally {
    best: AlignmentRecord,
    hits: usize,
}

/// In-progress reduction; feed records with [`push`](Self::push), then [`finish`](Self::finish)
#[derive(Debug)]
pub struct HitAccumulator {
    reaction_id: String,
    noise_floor: f64,
    top_n: usize,
    // Insertion order is first-appearance order, the tie-break for ranking
    genes: IndexMap<String, GeneTally>,
    seen: usize,
    below_floor: usize,
}

impl HitAccumulator {
    pub fn push(&mut self, record: AlignmentRecord) {
        self.seen += 1;

        // NaN scores fail this comparison too
        if !(record.bit_score >= self.noise_floor) {
            self.below_floor += 1;
            return;
        }

        match self.genes.entry(record.target_gene.clone()) {
            Entry::Occupied(mut slot) => {
                let tally = slot.get_mut();
                tally.hits += 1;
                // Strictly greater: the first record seen keeps a tied score
                if record.bit_score > tally.best.bit_score {
                    tally.best = record;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(GeneTally {
                    best: record,
                    hits: 1,
                });
            }
        }
    }

    pub fn distinct_genes(&self) -> usize {
        self.genes.len()
    }

    /// Top genes by best score, descending; equal scores keep first-appearance order
    pub fn finish(self) -> Vec<RankedHit> {
        let mut heap: BinaryHeap<Reverse<Ranked>> = BinaryHeap::with_capacity(self.top_n + 1);
        for (order, tally) in self.genes.values().enumerate() {
            heap.push(Reverse(Ranked {
                score: tally.best.bit_score,
                order,
            }));
            if heap.len() > self.top_n {
                heap.pop();
            }
        }

        // Ascending `Reverse` is descending rank
        let selected: Vec<usize> = heap.into_sorted_vec().into_iter().map(|r| r.0.order).collect();

        let distinct = self.distinct_genes();
        let mut slots: Vec<Option<GeneTally>> = self.genes.into_values().map(Some).collect();
        let hits: Vec<RankedHit> = selected
            .into_iter()
            .filter_map(|order| slots[order].take())
            .map(|tally| RankedHit {
                reaction_id: self.reaction_id.clone(),
                record: tally.best,
                total_hit_count: tally.hits,
            })
            .collect();

        debug!(
            "{}: {} records, {} below floor {}, {} distinct genes, {} reported",
            self.reaction_id,
            self.seen,
            self.below_floor,
            self.noise_floor,
            distinct,
            hits.len()
        );
        hits
    }
}

/// Heap key: a higher score ranks higher, then an earlier first appearance
#[derive(Debug, Clone, Copy)]
struct Ranked {
    score: f64,
    order: usize,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.order.cmp(&self.order))
    }
}
