// Network family: byte/error counters of the first interface, plus referenced memory.

use super::series::*;
use crate::models::{ContainerStats, Point, make_point};
use std::collections::BTreeMap;

pub(super) fn points(stats: &ContainerStats) -> Vec<Point> {
    let ts = stats.timestamp;
    let no_tags = BTreeMap::new();
    let mut points = Vec::new();

    // Only the first reported interface is sampled.
    if let Some(iface) = stats
        .network
        .as_ref()
        .and_then(|n| n.interfaces.first())
    {
        points.push(make_point(RX_BYTES, &no_tags, iface.rx_bytes, ts));
        points.push(make_point(RX_ERRORS, &no_tags, iface.rx_errors, ts));
        points.push(make_point(TX_BYTES, &no_tags, iface.tx_bytes, ts));
        points.push(make_point(TX_ERRORS, &no_tags, iface.tx_errors, ts));
    }

    points.push(make_point(
        REFERENCED_MEMORY,
        &no_tags,
        stats.referenced_memory,
        ts,
    ));
    points
}
