// Memory family: usage gauges plus allocation-failure counters per scope and fault kind.

use super::series::*;
use crate::models::{ContainerStats, MemoryStatsMemoryData, Point, make_point};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub(super) fn points(stats: &ContainerStats) -> Vec<Point> {
    let Some(mem) = stats.memory.as_ref() else {
        return Vec::new();
    };
    let ts = stats.timestamp;
    let no_tags = BTreeMap::new();

    let mut points = vec![
        make_point(MEMORY_USAGE, &no_tags, mem.usage, ts),
        make_point(MEMORY_MAX_USAGE, &no_tags, mem.max_usage, ts),
        make_point(MEMORY_CACHE, &no_tags, mem.cache, ts),
        make_point(MEMORY_RSS, &no_tags, mem.rss, ts),
        make_point(MEMORY_SWAP, &no_tags, mem.swap, ts),
        make_point(MEMORY_MAPPED_FILE, &no_tags, mem.mapped_file, ts),
        make_point(MEMORY_WORKING_SET, &no_tags, mem.working_set, ts),
        make_point(MEMORY_FAILCNT, &no_tags, mem.failcnt, ts),
    ];
    failure_points(&mut points, "container", &mem.container_data, ts);
    failure_points(&mut points, "hierarchical", &mem.hierarchical_data, ts);
    points
}

fn failure_points(
    points: &mut Vec<Point>,
    scope: &str,
    data: &MemoryStatsMemoryData,
    ts: DateTime<Utc>,
) {
    for (failure_type, value) in [("pgfault", data.pgfault), ("pgmajfault", data.pgmajfault)] {
        let mut point = make_point(MEMORY_FAILURE, &BTreeMap::new(), value, ts);
        point.add_tag(TAG_FAILURE_TYPE, failure_type);
        point.add_tag(TAG_SCOPE, scope);
        points.push(point);
    }
}
