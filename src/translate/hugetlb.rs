// Hugepages family: usage, max usage and fail count per page size.

use super::series::*;
use crate::models::{ContainerSpec, ContainerStats, Point, make_point};
use std::collections::BTreeMap;

pub(super) fn points(spec: &ContainerSpec, stats: &ContainerStats) -> Vec<Point> {
    if !spec.has_hugetlb {
        return Vec::new();
    }
    let Some(hugetlb) = stats.hugetlb.as_ref() else {
        return Vec::new();
    };
    let ts = stats.timestamp;

    let mut points = Vec::with_capacity(hugetlb.len() * 3);
    for (page_size, stat) in hugetlb {
        let mut tags = BTreeMap::new();
        tags.insert(TAG_PAGE_SIZE.to_string(), page_size.clone());
        points.push(make_point(HUGETLB_USAGE, &tags, stat.usage, ts));
        points.push(make_point(HUGETLB_MAX_USAGE, &tags, stat.max_usage, ts));
        points.push(make_point(HUGETLB_FAILCNT, &tags, stat.failcnt, ts));
    }
    points
}
