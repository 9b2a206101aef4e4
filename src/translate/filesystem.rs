// Filesystem family: usage and limit, only for containers that declare a filesystem.

use super::series::*;
use crate::models::{ContainerSpec, ContainerStats, Point, make_point};
use std::collections::BTreeMap;

pub(super) fn points(spec: &ContainerSpec, stats: &ContainerStats) -> Vec<Point> {
    if !spec.has_filesystem {
        return Vec::new();
    }
    let Some(fs) = stats.filesystem.as_ref() else {
        return Vec::new();
    };
    let ts = stats.timestamp;

    let mut usage_tags = BTreeMap::new();
    usage_tags.insert(TAG_TYPE.to_string(), "usage".to_string());
    let usage = make_point(
        FS_USAGE,
        &usage_tags,
        fs.total_usage_bytes.unwrap_or_default(),
        ts,
    );

    // TODO: the source reports neither a device nor a limit for container
    // filesystems yet; fs_limit keeps empty placeholders until it does.
    let mut limit_tags = BTreeMap::new();
    limit_tags.insert(TAG_DEVICE.to_string(), String::new());
    limit_tags.insert(TAG_TYPE.to_string(), "limit".to_string());
    let limit = make_point(FS_LIMIT, &limit_tags, "", ts);

    vec![usage, limit]
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::models::FieldValue;

    #[test]
    fn emits_usage_and_limit_when_declared() {
        let points = points(&web_spec(), &cpu_sample());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].measurement, FS_USAGE);
        assert_eq!(points[0].tag(TAG_TYPE), Some("usage"));
        assert_eq!(points[0].value(), Some(&FieldValue::I64(4096)));
        assert_eq!(points[1].measurement, FS_LIMIT);
        assert_eq!(points[1].tag(TAG_TYPE), Some("limit"));
        assert_eq!(points[1].tag(TAG_DEVICE), Some(""));
    }

    #[test]
    fn undeclared_filesystem_yields_nothing() {
        let mut spec = web_spec();
        spec.has_filesystem = false;
        assert!(points(&spec, &cpu_sample()).is_empty());
    }

    #[test]
    fn declared_but_unreported_filesystem_yields_nothing() {
        let mut stats = cpu_sample();
        stats.filesystem = None;
        assert!(points(&web_spec(), &stats).is_empty());
    }
}
