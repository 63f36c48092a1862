//! The test-session controller.
//!
//! A [`CoverageSession`] is the single owner of a session's aggregate
//! reports. The test driver creates one at session start, instruments each
//! run's design through it, hands each run's observers back through
//! [`CoverageSession::finish_run`], and calls [`CoverageSession::emit_all`]
//! once at the end.

use crate::aggregate::AggregateReport;
use crate::error::CoverageError;
use crate::instrument::{instrument, Instrumentation};
use crate::naming::Namer;
use crate::observer::CoverageObserver;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use vigil_common::Facet;
use vigil_config::VigilConfig;
use vigil_sim::SimConfig;
use vigil_tree::Design;

/// Per-session accumulator of every enabled facet.
#[derive(Debug, Clone)]
pub struct CoverageSession {
    label: String,
    prefix: String,
    output_dir: PathBuf,
    namer: Namer,
    sim: SimConfig,
    facets: Vec<Facet>,
    reports: BTreeMap<Facet, AggregateReport>,
}

impl CoverageSession {
    /// A session collecting `facets`, writing reports named after `label`
    /// into the current directory.
    pub fn new(label: impl Into<String>, facets: &[Facet]) -> Self {
        let label = label.into();
        let mut unique: Vec<Facet> = Vec::with_capacity(facets.len());
        for &facet in facets {
            if !unique.contains(&facet) {
                unique.push(facet);
            }
        }
        Self {
            prefix: label.clone(),
            label,
            output_dir: PathBuf::from("."),
            namer: Namer::new(),
            sim: SimConfig::default(),
            reports: unique.iter().map(|&f| (f, AggregateReport::new(f))).collect(),
            facets: unique,
        }
    }

    /// A session configured from `vigil.toml`.
    pub fn from_config(config: &VigilConfig) -> Self {
        let coverage = &config.coverage;
        let mut session = Self::new(coverage.label.clone(), &coverage.facets);
        session.prefix = coverage.report_prefix().to_string();
        session.output_dir = coverage.output_dir.clone();
        session.namer = match &coverage.source_anchor {
            Some(anchor) => Namer::with_anchor(anchor.clone()),
            None => Namer::new(),
        };
        session.sim = SimConfig {
            max_deltas: config.simulation.max_deltas,
        };
        session
    }

    /// The session label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Enabled facets in reporting order.
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    /// Engine limits for the session's runs.
    pub fn sim_config(&self) -> &SimConfig {
        &self.sim
    }

    /// Instruments a run's design for every enabled facet.
    pub fn instrument(&self, design: &mut Design) -> Result<Instrumentation, CoverageError> {
        instrument(design, &self.facets, &self.namer)
    }

    /// Merges one completed (or aborted) run.
    pub fn finish_run(&mut self, instrumentation: &Instrumentation, observers: &[CoverageObserver]) {
        for observer in observers {
            let facet = observer.facet();
            let Some(report) = self.reports.get_mut(&facet) else {
                tracing::warn!(facet = %facet, "observer for a facet this session does not collect");
                continue;
            };
            let descriptors = instrumentation
                .plan(facet)
                .map(|p| p.descriptors.as_slice())
                .unwrap_or_default();
            report.merge(observer.get_results(), descriptors);
            tracing::debug!(facet = %facet, steps = observer.steps(), "merged run");
        }
    }

    /// The aggregate of one facet.
    pub fn report(&self, facet: Facet) -> Option<&AggregateReport> {
        self.reports.get(&facet)
    }

    /// `<dir>/<prefix>_<facet>_cov.json`.
    pub fn report_path(&self, dir: &Path, facet: Facet) -> PathBuf {
        dir.join(format!("{}_{}_cov.json", self.prefix, facet))
    }

    /// Writes every facet's document into `out_dir` and returns the summary
    /// lines in facet order.
    pub fn emit_all(&self, out_dir: &Path) -> Result<Vec<String>, CoverageError> {
        let mut lines = Vec::with_capacity(self.facets.len());
        for facet in &self.facets {
            if let Some(report) = self.reports.get(facet) {
                lines.push(report.write_json(&self.report_path(out_dir, *facet), &self.label)?);
            }
        }
        Ok(lines)
    }

    /// [`emit_all`](Self::emit_all) into the configured output directory.
    pub fn emit(&self) -> Result<Vec<String>, CoverageError> {
        self.emit_all(&self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::sample;
    use vigil_sim::Simulator;

    #[test]
    fn from_config_applies_settings() {
        let config = vigil_config::load_config_from_str(
            r#"
[coverage]
label = "test_gpio"
facets = ["block", "statement"]
report_prefix = "gpio"
source_anchor = "ip"

[simulation]
max_deltas = 77
"#,
        )
        .unwrap();
        let session = CoverageSession::from_config(&config);
        assert_eq!(session.label(), "test_gpio");
        assert_eq!(session.facets(), &[Facet::Block, Facet::Statement]);
        assert_eq!(session.sim_config().max_deltas, 77);
        assert_eq!(
            session.report_path(Path::new("out"), Facet::Block),
            Path::new("out/gpio_block_cov.json")
        );
    }

    #[test]
    fn runs_accumulate_across_designs() {
        let mut session = CoverageSession::new("t", &[Facet::Block]);
        for _ in 0..2 {
            let mut design = sample();
            let inst = session.instrument(&mut design).unwrap();
            let mut observers = inst.observers();
            {
                let mut sim = Simulator::new(&design).unwrap();
                for obs in observers.iter_mut() {
                    sim.add_observer(obs);
                }
                sim.settle().unwrap();
            }
            session.finish_run(&inst, &observers);
        }
        let report = session.report(Facet::Block).unwrap();
        assert_eq!(report.runs(), 2);
        assert_eq!(report.descriptors().count(), 7);
        // both comb roots were entered on each run's settle
        assert_eq!(report.summary().covered, 2);
    }

    #[test]
    fn foreign_observers_are_ignored() {
        let mut session = CoverageSession::new("t", &[Facet::Block]);
        let obs = CoverageObserver::new(Facet::Expression, Default::default());
        session.finish_run(&Instrumentation::default(), &[obs]);
        assert_eq!(session.report(Facet::Block).unwrap().runs(), 0);
        assert!(session.report(Facet::Expression).is_none());
    }

    #[test]
    fn emit_all_writes_one_file_per_facet() {
        let dir = tempfile::tempdir().unwrap();
        let session = CoverageSession::new("t", &Facet::ALL);
        let lines = session.emit_all(dir.path()).unwrap();
        assert_eq!(lines[0], "[Statement coverage for t] 0/0 = 100.0%");
        for facet in Facet::ALL {
            assert!(session.report_path(dir.path(), facet).exists());
        }
    }
}
