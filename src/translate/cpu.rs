// CPU family: cumulative usage, per-core usage, load average.

use super::TranslateError;
use super::series::*;
use crate::models::{ContainerStats, Point, make_point};
use std::collections::BTreeMap;

pub(super) fn points(stats: &ContainerStats) -> Result<Vec<Point>, TranslateError> {
    let Some(cpu) = stats.cpu.as_ref() else {
        return Ok(Vec::new());
    };
    let ts = stats.timestamp;
    let no_tags = BTreeMap::new();

    let mut points = vec![
        make_point(CPU_USAGE_TOTAL, &no_tags, cpu.usage.total, ts),
        make_point(CPU_USAGE_SYSTEM, &no_tags, cpu.usage.system, ts),
        make_point(CPU_USAGE_USER, &no_tags, cpu.usage.user, ts),
    ];

    if let Some(per_cpu) = cpu.usage.per_cpu_usage.as_ref() {
        if per_cpu.is_empty() {
            return Err(TranslateError::EmptyPerCpuUsage);
        }
        for (i, usage) in per_cpu.iter().enumerate() {
            let mut point = make_point(CPU_USAGE_PER_CPU, &no_tags, *usage, ts);
            point.add_tag(TAG_INSTANCE, i.to_string());
            points.push(point);
        }
    }

    points.push(make_point(LOAD_AVERAGE, &no_tags, cpu.load_average, ts));
    Ok(points)
}
