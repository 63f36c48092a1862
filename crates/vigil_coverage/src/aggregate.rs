//! Cross-run aggregation and report emission.
//!
//! An [`AggregateReport`] accumulates one facet over a whole test session.
//! Runs are merged by identity, which is stable across processes because
//! tagging is deterministic, so merges may happen in any order and reports
//! written by separate processes can be merged back from their JSON form.

use crate::counter::{count, merge_counts, OutcomeCounter};
use crate::descriptor::{ConstructKind, Descriptor};
use crate::error::CoverageError;
use crate::report::{
    AssertionRecord, CoverageDocument, ExpressionRecord, HitRecord, ListingOptions, SortBy,
    Summary,
};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use vigil_common::{ContentHash, ContentHasher, Facet, Outcome};
use vigil_tree::CoverageId;

/// Append-only accumulator of one facet's descriptors and outcome counts.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    facet: Facet,
    descriptors: BTreeMap<CoverageId, Descriptor>,
    counts: OutcomeCounter,
    runs: u64,
}

impl AggregateReport {
    /// An empty report.
    pub fn new(facet: Facet) -> Self {
        Self {
            facet,
            descriptors: BTreeMap::new(),
            counts: OutcomeCounter::new(),
            runs: 0,
        }
    }

    /// The aggregated facet.
    pub fn facet(&self) -> Facet {
        self.facet
    }

    /// Number of runs merged so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Known descriptors in identity order.
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.values()
    }

    /// Summed counts.
    pub fn counts(&self) -> &OutcomeCounter {
        &self.counts
    }

    /// Summed count of one identity and outcome.
    pub fn count(&self, id: &CoverageId, outcome: Outcome) -> u64 {
        count(&self.counts, id, outcome)
    }

    /// Merges one run. Descriptors already known keep their first name;
    /// counts are summed. Never fails.
    pub fn merge(&mut self, results: &OutcomeCounter, descriptors: &[Descriptor]) {
        for d in descriptors {
            if d.facet != self.facet {
                tracing::warn!(
                    report = %self.facet,
                    descriptor = %d.facet,
                    id = %d.id,
                    "skipping descriptor of another facet"
                );
                continue;
            }
            self.descriptors
                .entry(d.id.clone())
                .or_insert_with(|| d.clone());
        }
        merge_counts(&mut self.counts, results);
        self.runs += 1;
    }

    /// Merges another report of the same facet, e.g. one read back from a
    /// document written by another process.
    pub fn merge_report(&mut self, other: &AggregateReport) {
        if other.facet != self.facet {
            tracing::warn!(
                report = %self.facet,
                other = %other.facet,
                "refusing to merge reports of different facets"
            );
            return;
        }
        if !self.descriptors.is_empty()
            && !other.descriptors.is_empty()
            && self.fingerprint() != other.fingerprint()
        {
            tracing::warn!(
                facet = %self.facet,
                ours = %self.fingerprint(),
                theirs = %other.fingerprint(),
                "merging reports built from different descriptor sets"
            );
        }
        for (id, d) in &other.descriptors {
            self.descriptors.entry(id.clone()).or_insert_with(|| d.clone());
        }
        merge_counts(&mut self.counts, &other.counts);
        self.runs = self.runs.saturating_add(other.runs);
    }

    /// Content hash of the facet and every descriptor id and name.
    pub fn fingerprint(&self) -> ContentHash {
        let mut hasher = ContentHasher::new();
        hasher.field(self.facet.as_str().as_bytes());
        for d in self.descriptors.values() {
            hasher.field(d.id.to_string().as_bytes());
            hasher.field(d.name.as_bytes());
        }
        hasher.finish()
    }

    fn total(&self, id: &CoverageId) -> u64 {
        self.facet
            .outcomes()
            .iter()
            .map(|&o| self.count(id, o))
            .fold(0u64, u64::saturating_add)
    }

    /// Whether one identity counts as covered: executed for statements and
    /// blocks, any activity for assertions, both polarities for expressions.
    pub fn is_covered(&self, id: &CoverageId) -> bool {
        match self.facet {
            Facet::Statement | Facet::Block => self.count(id, Outcome::Hit) > 0,
            Facet::Assertion => self.total(id) > 0,
            Facet::Expression => {
                self.count(id, Outcome::True) > 0 && self.count(id, Outcome::False) > 0
            }
        }
    }

    /// Covered, total and percent over the known descriptors.
    pub fn summary(&self) -> Summary {
        let total = self.descriptors.len();
        let covered = self.descriptors.keys().filter(|id| self.is_covered(id)).count();
        let percent = if total == 0 {
            100.0
        } else {
            covered as f64 / total as f64 * 100.0
        };
        let failed = (self.facet == Facet::Assertion).then(|| {
            self.descriptors
                .keys()
                .filter(|id| self.count(id, Outcome::Fail) > 0)
                .count()
        });
        Summary {
            covered,
            total,
            percent,
            failed,
        }
    }

    /// `[<Facet> coverage for <label>] <covered>/<total> = <pct>%`.
    pub fn summary_line(&self, label: &str) -> String {
        let s = self.summary();
        format!(
            "[{} coverage for {label}] {}/{} = {:.1}%",
            self.facet.title(),
            s.covered,
            s.total,
            s.percent
        )
    }

    /// Builds the summary line and the structured document.
    pub fn emit(&self, label: &str) -> (String, CoverageDocument) {
        let line = self.summary_line(label);
        let summary = self.summary();
        tracing::info!(
            facet = %self.facet,
            covered = summary.covered,
            total = summary.total,
            failed = summary.failed,
            "{line}"
        );

        let mut doc = CoverageDocument {
            facet: self.facet,
            label: label.to_string(),
            runs: self.runs,
            fingerprint: self.fingerprint().to_string(),
            summary,
            statements: None,
            blocks: None,
            assertions: None,
            expressions: None,
        };
        match self.facet {
            Facet::Statement => doc.statements = Some(self.hit_records()),
            Facet::Block => doc.blocks = Some(self.hit_records()),
            Facet::Assertion => {
                doc.assertions = Some(
                    self.descriptors
                        .values()
                        .map(|d| {
                            let fail = self.count(&d.id, Outcome::Fail);
                            AssertionRecord {
                                id: d.id.to_string(),
                                name: d.name.clone(),
                                kind: d.kind.to_string(),
                                true_count: self.count(&d.id, Outcome::True),
                                false_count: self.count(&d.id, Outcome::False),
                                fail,
                                failed: fail > 0,
                            }
                        })
                        .collect(),
                )
            }
            Facet::Expression => {
                doc.expressions = Some(
                    self.descriptors
                        .values()
                        .map(|d| ExpressionRecord {
                            id: d.id.to_string(),
                            name: d.name.clone(),
                            kind: d.kind.to_string(),
                            true_hits: self.count(&d.id, Outcome::True),
                            false_hits: self.count(&d.id, Outcome::False),
                            covered: self.is_covered(&d.id),
                        })
                        .collect(),
                )
            }
        }
        (line, doc)
    }

    fn hit_records(&self) -> Vec<HitRecord> {
        self.descriptors
            .values()
            .map(|d| HitRecord {
                id: d.id.to_string(),
                name: d.name.clone(),
                kind: d.kind.to_string(),
                hits: self.count(&d.id, Outcome::Hit),
            })
            .collect()
    }

    /// Writes the document as pretty JSON to `path`, creating parent
    /// directories, and returns the summary line.
    pub fn write_json(&self, path: &Path, label: &str) -> Result<String, CoverageError> {
        let (line, doc) = self.emit(label);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(&doc)?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(line)
    }

    /// Rebuilds a report from a written document.
    pub fn from_document(doc: &CoverageDocument) -> Result<Self, CoverageError> {
        let mut report = Self::new(doc.facet);
        report.runs = doc.runs;

        let mut add = |id: &str,
                       name: &str,
                       kind: &str,
                       outcomes: &[(Outcome, u64)]|
         -> Result<(), CoverageError> {
            let id: CoverageId = id
                .parse()
                .map_err(|_| CoverageError::MalformedId(id.to_string()))?;
            let kind: ConstructKind = serde_json::from_value(serde_json::Value::from(kind))?;
            for &(outcome, n) in outcomes {
                if n > 0 {
                    report.counts.insert((id.clone(), outcome), n);
                }
            }
            report.descriptors.insert(
                id.clone(),
                Descriptor {
                    id,
                    name: name.to_string(),
                    kind,
                    facet: doc.facet,
                },
            );
            Ok(())
        };

        match doc.facet {
            Facet::Statement | Facet::Block => {
                let records = if doc.facet == Facet::Statement {
                    &doc.statements
                } else {
                    &doc.blocks
                };
                for r in records.iter().flatten() {
                    add(&r.id, &r.name, &r.kind, &[(Outcome::Hit, r.hits)])?;
                }
            }
            Facet::Assertion => {
                for r in doc.assertions.iter().flatten() {
                    add(
                        &r.id,
                        &r.name,
                        &r.kind,
                        &[
                            (Outcome::True, r.true_count),
                            (Outcome::False, r.false_count),
                            (Outcome::Fail, r.fail),
                        ],
                    )?;
                }
            }
            Facet::Expression => {
                for r in doc.expressions.iter().flatten() {
                    add(
                        &r.id,
                        &r.name,
                        &r.kind,
                        &[(Outcome::True, r.true_hits), (Outcome::False, r.false_hits)],
                    )?;
                }
            }
        }

        if report.fingerprint().to_string() != doc.fingerprint {
            tracing::warn!(
                facet = %doc.facet,
                label = %doc.label,
                "document fingerprint does not match its records"
            );
        }
        Ok(report)
    }

    /// Reads a document written by [`write_json`](Self::write_json).
    pub fn read_json(path: &Path) -> Result<Self, CoverageError> {
        let text = std::fs::read_to_string(path)?;
        let doc: CoverageDocument = serde_json::from_str(&text)?;
        Self::from_document(&doc)
    }

    /// A per-identity text listing, one line per identity:
    /// `<hit|miss|FAIL> <total count> <id> <name>`.
    pub fn render_listing(&self, opts: &ListingOptions) -> String {
        let mut rows: Vec<(&Descriptor, bool, u64)> = self
            .descriptors
            .values()
            .map(|d| (d, self.is_covered(&d.id), self.total(&d.id)))
            .filter(|&(_, covered, _)| if covered { opts.show_hits } else { opts.show_misses })
            .collect();
        match opts.sort_by {
            SortBy::Id => {}
            SortBy::Name => rows.sort_by(|a, b| a.0.name.cmp(&b.0.name).then(a.0.id.cmp(&b.0.id))),
            SortBy::Hits => rows.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.id.cmp(&b.0.id))),
        }

        let limit = opts.max_print.unwrap_or(rows.len());
        let mut out = String::new();
        for (d, covered, total) in rows.iter().take(limit) {
            let marker = if self.count(&d.id, Outcome::Fail) > 0 {
                "FAIL"
            } else if *covered {
                "hit"
            } else {
                "miss"
            };
            let _ = writeln!(out, "{marker:<4} {total:>6}  {}  {}", d.id, d.name);
        }
        if rows.len() > limit {
            let _ = writeln!(out, "... {} more", rows.len() - limit);
        }
        out
    }
}
