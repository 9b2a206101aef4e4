// Perf counters: one point per reported counter.

use super::series::*;
use crate::models::{ContainerStats, Point, make_point};
use std::collections::BTreeMap;

pub(super) fn points(stats: &ContainerStats) -> Vec<Point> {
    stats
        .perf_stats
        .iter()
        .map(|perf| {
            let mut point = make_point(PERF_STAT, &BTreeMap::new(), perf.value, stats.timestamp);
            point.add_tag(TAG_CPU, perf.cpu.to_string());
            point.add_tag(TAG_NAME, perf.name.clone());
            point.add_tag(TAG_SCALING_RATIO, perf.scaling_ratio.to_string());
            point
        })
        .collect()
}
