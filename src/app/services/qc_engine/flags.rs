//! Flag aggregation, classification and cleaning
//!
//! Detector verdicts are merged per measurement with "most severe wins".
//! Present measurements nobody objected to end up `Good`; absent ones stay
//! `Missing` and are excluded from every count.

use crate::app::models::{DataQuality, Profile, QcFlag, Variable};
use std::collections::BTreeMap;

use super::detectors::FlagAssignment;

/// Final flags for every (measured variable, level) pair of a profile
#[derive(Debug, Clone, PartialEq)]
pub struct FlagMatrix {
    flags: BTreeMap<Variable, Vec<QcFlag>>,
}

impl FlagMatrix {
    /// Start with `Missing` for absent values and `NoQc` for present ones
    pub fn new(profile: &Profile) -> Self {
        let flags = Variable::measured()
            .into_iter()
            .map(|variable| {
                let initial = profile
                    .values(variable)
                    .iter()
                    .map(|value| match value {
                        Some(_) => QcFlag::NoQc,
                        None => QcFlag::Missing,
                    })
                    .collect();
                (variable, initial)
            })
            .collect();

        Self { flags }
    }

    /// Merge one verdict, keeping the more severe flag
    ///
    /// Assignments for untracked variables or out-of-bounds levels are
    /// ignored.
    pub fn apply(&mut self, assignment: &FlagAssignment) {
        if let Some(slot) = self
            .flags
            .get_mut(&assignment.variable)
            .and_then(|flags| flags.get_mut(assignment.index))
        {
            *slot = slot.most_severe(assignment.flag);
        }
    }

    /// Merge a batch of verdicts
    pub fn apply_all<'a>(&mut self, assignments: impl IntoIterator<Item = &'a FlagAssignment>) {
        for assignment in assignments {
            self.apply(assignment);
        }
    }

    /// Promote present measurements that were never flagged to `Good`
    pub fn finalize(&mut self) {
        for flag in self.flags.values_mut().flatten() {
            if *flag == QcFlag::NoQc {
                *flag = QcFlag::Good;
            }
        }
    }

    /// Flag of one measurement
    pub fn flag(&self, variable: Variable, index: usize) -> Option<QcFlag> {
        self.flags.get(&variable)?.get(index).copied()
    }

    /// Flags of one measured variable
    pub fn flags(&self, variable: Variable) -> &[QcFlag] {
        self.flags.get(&variable).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Count present measurements by final flag
    pub fn summarize(&self) -> FlagSummary {
        let mut summary = FlagSummary::default();
        for &flag in self.flags.values().flatten() {
            if flag == QcFlag::Missing {
                continue;
            }
            summary.total += 1;
            if flag.is_good() {
                summary.good += 1;
            }
            if flag.is_masked() {
                summary.masked += 1;
            }
            *summary.counts.entry(flag).or_insert(0) += 1;
        }
        summary
    }
}

/// Flag counts over the present measurements of a profile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagSummary {
    pub total: usize,
    pub good: usize,
    pub masked: usize,
    pub counts: BTreeMap<QcFlag, usize>,
}

impl FlagSummary {
    pub fn good_data_percentage(&self) -> f64 {
        good_data_percentage(self.good, self.total)
    }

    pub fn classify(&self) -> DataQuality {
        DataQuality::from_percentage(self.good_data_percentage())
    }
}

/// `100 * good / total`, zero when nothing is present
pub fn good_data_percentage(good: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (good as f64 / total as f64) * 100.0
    }
}

/// Copy of the profile with every bad-or-worse measurement set to missing
///
/// Lengths are preserved so the cleaned and raw profiles stay aligned.
pub fn clean_profile(profile: &Profile, flags: &FlagMatrix) -> Profile {
    let mut cleaned = profile.clone();
    for variable in Variable::measured() {
        for (index, value) in cleaned.values_mut(variable).iter_mut().enumerate() {
            if flags
                .flag(variable, index)
                .is_some_and(|flag| flag.is_masked())
            {
                *value = None;
            }
        }
    }
    cleaned
}
