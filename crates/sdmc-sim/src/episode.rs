//! Epoch-indexed ground truth for one episode.

use sdmc_core::{CarId, Epoch, EpochInfo, Point};

use crate::{SimError, SimResult};

/// Every [`EpochInfo`] of an episode, indexed by [`Epoch`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpisodeStore {
    epochs: Vec<EpochInfo>,
}

impl EpisodeStore {
    /// Wrap pre-generated epochs.  Snapshot times must not decrease.
    pub fn new(epochs: Vec<EpochInfo>) -> SimResult<Self> {
        if let Some(i) = epochs.windows(2).position(|w| w[1].time < w[0].time) {
            return Err(SimError::Config(format!(
                "epoch {} is timed before epoch {i}",
                i + 1
            )));
        }
        Ok(Self { epochs })
    }

    /// Append the next epoch (for environments that stream snapshots).
    pub fn push(&mut self, epoch: EpochInfo) -> SimResult<Epoch> {
        if let Some(last) = self.epochs.last() {
            if epoch.time < last.time {
                return Err(SimError::Config(format!(
                    "epoch at t={} follows epoch at t={}",
                    epoch.time, last.time
                )));
            }
        }
        self.epochs.push(epoch);
        Ok(Epoch(self.epochs.len() as u64 - 1))
    }

    pub fn get(&self, epoch: Epoch) -> Option<&EpochInfo> {
        self.epochs.get(epoch.index())
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Index of the final stored epoch.
    pub fn last_epoch(&self) -> Option<Epoch> {
        self.epochs.len().checked_sub(1).map(|n| Epoch(n as u64))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EpochInfo> + '_ {
        self.epochs.iter()
    }

    /// Where `car` was reported at `epoch`.
    pub fn car_position(&self, epoch: Epoch, car: &CarId) -> Option<Point> {
        self.get(epoch).and_then(|info| info.car_position(car))
    }
}
