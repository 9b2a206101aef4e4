// Resource control: memory bandwidth per node and last-level cache occupancy.

use super::series::*;
use crate::models::{ContainerStats, Point, make_point};
use std::collections::BTreeMap;

fn node_tags(node_id: usize) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    tags.insert(TAG_NODE_ID.to_string(), node_id.to_string());
    tags
}

pub(super) fn points(stats: &ContainerStats) -> Vec<Point> {
    let ts = stats.timestamp;
    let resctrl = &stats.resctrl;
    let mut points = Vec::with_capacity(resctrl.memory_bandwidth.len() * 2 + resctrl.cache.len());

    for (node_id, bandwidth) in resctrl.memory_bandwidth.iter().enumerate() {
        let tags = node_tags(node_id);
        points.push(make_point(
            RESCTRL_MEMORY_BANDWIDTH_TOTAL,
            &tags,
            bandwidth.total_bytes,
            ts,
        ));
        points.push(make_point(
            RESCTRL_MEMORY_BANDWIDTH_LOCAL,
            &tags,
            bandwidth.local_bytes,
            ts,
        ));
    }

    for (node_id, cache) in resctrl.cache.iter().enumerate() {
        points.push(make_point(
            RESCTRL_LLC_OCCUPANCY,
            &node_tags(node_id),
            cache.llc_occupancy,
            ts,
        ));
    }
    points
}
