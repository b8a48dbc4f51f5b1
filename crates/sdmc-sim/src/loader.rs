//! CSV episode loader.
//!
//! # CSV format
//!
//! One row per (epoch, car, route waypoint).  A car with no route this epoch
//! gets a single row with the waypoint columns left empty.
//!
//! ```csv
//! epoch,time,car_id,car_x,car_y,waypoint_id,waypoint_x,waypoint_y,waypoint_time
//! 0,0.0,car1,0.0,0.0,wp1,1.0,0.0,1.0
//! 0,0.0,car1,0.0,0.0,wp2,2.0,0.0,2.0
//! 0,0.0,car2,5.0,5.0,,,,
//! 1,1.0,car1,1.0,0.0,wp2,2.0,0.0,2.1
//! ```
//!
//! Waypoint ids may carry a prefix (`wp2`, `car1-002`); only the trailing
//! number is kept.  Epoch numbers must cover `0..=max` without gaps, though an
//! epoch with no cars can be written as a single row with an empty `car_id`.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use sdmc_core::{CarId, CarObservation, EpochInfo, Point, RouteWaypoint, WaypointId};

use crate::{EpisodeStore, SimError, SimResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct EpochRecord {
    epoch:         u64,
    time:          f64,
    car_id:        Option<String>,
    car_x:         Option<f64>,
    car_y:         Option<f64>,
    waypoint_id:   Option<String>,
    waypoint_x:    Option<f64>,
    waypoint_y:    Option<f64>,
    waypoint_time: Option<f64>,
}

/// Per-car rows while an epoch is being assembled.
struct CarRows {
    position:  Point,
    waypoints: Vec<RouteWaypoint>,
    routeless: bool,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an episode from a CSV file.
pub fn load_episode_csv(path: &Path) -> SimResult<EpisodeStore> {
    let file = std::fs::File::open(path)?;
    load_episode_reader(file)
}

/// Like [`load_episode_csv`] but accepts any `Read` source.
pub fn load_episode_reader<R: Read>(reader: R) -> SimResult<EpisodeStore> {
    // ── Parse CSV rows ────────────────────────────────────────────────────
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_epoch: BTreeMap<u64, (f64, BTreeMap<CarId, CarRows>)> = BTreeMap::new();

    for (line, result) in csv_reader.deserialize::<EpochRecord>().enumerate() {
        let row = result.map_err(|e| SimError::Parse(e.to_string()))?;
        let (time, cars) = by_epoch.entry(row.epoch).or_insert_with(|| (row.time, BTreeMap::new()));
        if *time != row.time {
            return Err(SimError::Parse(format!(
                "row {}: epoch {} has conflicting times {} and {}",
                line + 1,
                row.epoch,
                time,
                row.time
            )));
        }

        let Some(car_id) = row.car_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        let position = match (row.car_x, row.car_y) {
            (Some(x), Some(y)) => Point::new(x, y),
            _ => return Err(SimError::Parse(format!("row {}: car {car_id} has no position", line + 1))),
        };
        let entry = cars.entry(CarId::from(car_id)).or_insert_with(|| CarRows {
            position,
            waypoints: Vec::new(),
            routeless: false,
        });

        match parse_waypoint(&row, line + 1)? {
            Some(wp) => entry.waypoints.push(wp),
            None => entry.routeless = true,
        }
        if entry.routeless && !entry.waypoints.is_empty() {
            return Err(SimError::Parse(format!(
                "row {}: car {car_id} in epoch {} has both route and no-route rows",
                line + 1,
                row.epoch
            )));
        }
    }

    // ── Assemble one EpochInfo per epoch ──────────────────────────────────
    let mut epochs = Vec::with_capacity(by_epoch.len());
    for (expected, (epoch, (time, cars))) in by_epoch.into_iter().enumerate() {
        if epoch != expected as u64 {
            return Err(SimError::Parse(format!("epoch {expected} is missing")));
        }
        let mut info = EpochInfo::new(time);
        for (id, rows) in cars {
            let obs = if rows.waypoints.is_empty() {
                CarObservation::inactive(rows.position)
            } else {
                CarObservation::active(rows.position, rows.waypoints)
            };
            info.cars.insert(id, obs);
        }
        epochs.push(info);
    }

    EpisodeStore::new(epochs)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_waypoint(row: &EpochRecord, line: usize) -> SimResult<Option<RouteWaypoint>> {
    let Some(id) = row.waypoint_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let id: WaypointId = id.parse()?;
    match (row.waypoint_x, row.waypoint_y, row.waypoint_time) {
        (Some(x), Some(y), Some(t)) => Ok(Some(RouteWaypoint::new(id, Point::new(x, y), t))),
        _ => Err(SimError::Parse(format!(
            "row {line}: waypoint {id} needs waypoint_x, waypoint_y and waypoint_time"
        ))),
    }
}
