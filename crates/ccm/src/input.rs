//! Sample records as returned by the simulation service

use std::collections::BTreeMap;
use std::path::Path;

use ccm_core::SparseSample;
use color_eyre::eyre::WrapErr;
use serde::Deserialize;

/// A project assessment: gross impact plus the matching cost of each
/// explicitly simulated outcome.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectAssessment {
    pub gross_impact: SparseSample,
    pub cost: Vec<f64>,
}

/// Any of the accepted input shapes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InputDocument {
    Project(ProjectAssessment),
    Single(SparseSample),
    Named(BTreeMap<String, SparseSample>),
}

/// Named samples, each sorted and ready for the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    pub names: Vec<String>,
    pub samples: Vec<SparseSample>,
}

impl SampleSet {
    fn push(&mut self, name: impl Into<String>, mut sample: SparseSample) {
        sample.sort();
        self.names.push(name.into());
        self.samples.push(sample);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SparseSample)> {
        self.names.iter().map(String::as_str).zip(&self.samples)
    }
}

impl InputDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Flatten into named samples. A project yields its gross impact and its
    /// impact per unit cost.
    pub fn into_sample_set(self) -> color_eyre::Result<SampleSet> {
        let mut set = SampleSet::default();
        match self {
            InputDocument::Single(sample) => set.push("sample", sample),
            InputDocument::Named(records) => {
                for (name, sample) in records {
                    set.push(name, sample);
                }
            }
            InputDocument::Project(ProjectAssessment { gross_impact, cost }) => {
                // Costs line up with outcomes in response order, before sorting
                let per_cost = SparseSample::value_per_cost(
                    &gross_impact.samples,
                    &cost,
                    gross_impact.num_zeros,
                )
                .wrap_err("cost does not match the gross impact outcomes")?;
                set.push("gross_impact", gross_impact);
                set.push("impact_per_cost", per_cost);
            }
        }
        Ok(set)
    }
}

/// Read and flatten the JSON input at `path`.
pub fn load_input(path: &Path) -> color_eyre::Result<SampleSet> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read input {}", path.display()))?;
    let document = InputDocument::from_json(&content)
        .wrap_err_with(|| format!("Failed to parse input {}", path.display()))?;
    let set = document.into_sample_set()?;
    tracing::info!(samples = set.len(), path = %path.display(), "loaded input");
    Ok(set)
}
