use crate::progress::model::{ProgressMap, Status};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-status counts over a progress map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressStats {
    pub total: usize,
    pub counts: BTreeMap<String, usize>,
}

impl ProgressStats {
    pub fn from_map(progress: &ProgressMap) -> Self {
        let mut counts: BTreeMap<String, usize> = Status::ALL
            .iter()
            .map(|status| (status.to_string(), 0))
            .collect();
        for entry in progress.values() {
            *counts.entry(entry.status.to_string()).or_default() += 1;
        }

        Self {
            total: progress.len(),
            counts,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.counts.get(status.as_str()).copied().unwrap_or(0)
    }

    /// Percentage of entries in `status`, rounded to one decimal.
    pub fn share(&self, status: Status) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let ratio = self.count(status) as f64 * 100.0 / self.total as f64;
        (ratio * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::progress::model::UserProgress;
    use chrono::Utc;

    fn progress_of(statuses: &[Status]) -> ProgressMap {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let mut entry = UserProgress::new(Utc::now());
                entry.status = *status;
                (i.to_string(), entry)
            })
            .collect()
    }

    #[test]
    fn empty_map() {
        let stats = ProgressStats::from_map(&ProgressMap::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.counts.len(), 5);
        assert_eq!(stats.count(Status::Solved), 0);
        assert_eq!(stats.share(Status::Solved), 0.0);
    }

    #[test]
    fn counts_and_shares() {
        let stats = ProgressStats::from_map(&progress_of(&[
            Status::Solved,
            Status::Solved,
            Status::Todo,
        ]));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.count(Status::Solved), 2);
        assert_eq!(stats.count(Status::Todo), 1);
        assert_eq!(stats.count(Status::Revise), 0);
        assert_eq!(stats.share(Status::Solved), 66.7);
        assert_eq!(stats.share(Status::Todo), 33.3);
    }
}
