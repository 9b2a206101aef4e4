// Container stats -> time-series points, one pure function per stat family.
// Every point of a sample shares the sample timestamp and is stamped with
// machine, container and label tags once all families have run.

mod cpu;
mod filesystem;
mod hugetlb;
mod memory;
mod network;
mod perf;
mod resctrl;
pub mod series;

use crate::models::{ContainerSpec, ContainerStats, Point};
use std::collections::BTreeMap;
use thiserror::Error;

/// Malformed mandatory data in a stats sample.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("per-cpu usage is present but empty")]
    EmptyPerCpuUsage,
}

/// The fixed set of stat families a sample is translated through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatFamily {
    Cpu,
    Memory,
    Network,
    Hugetlb,
    Perf,
    Resctrl,
    Filesystem,
}

impl StatFamily {
    pub const ALL: [StatFamily; 7] = [
        StatFamily::Cpu,
        StatFamily::Memory,
        StatFamily::Network,
        StatFamily::Hugetlb,
        StatFamily::Perf,
        StatFamily::Resctrl,
        StatFamily::Filesystem,
    ];

    /// Points for this family only, without common tags.
    pub fn points(
        self,
        spec: &ContainerSpec,
        stats: &ContainerStats,
    ) -> Result<Vec<Point>, TranslateError> {
        let points = match self {
            StatFamily::Cpu => cpu::points(stats)?,
            StatFamily::Memory => memory::points(stats),
            StatFamily::Network => network::points(stats),
            StatFamily::Hugetlb => hugetlb::points(spec, stats),
            StatFamily::Perf => perf::points(stats),
            StatFamily::Resctrl => resctrl::points(stats),
            StatFamily::Filesystem => filesystem::points(spec, stats),
        };
        Ok(points)
    }
}

#[derive(Debug, Clone)]
pub struct Translator {
    machine_name: String,
    families: Vec<StatFamily>,
}

impl Translator {
    pub fn new(machine_name: impl Into<String>) -> Self {
        Self {
            machine_name: machine_name.into(),
            families: StatFamily::ALL.to_vec(),
        }
    }

    /// Restrict translation to `families`, in the given order.
    pub fn with_families(mut self, families: &[StatFamily]) -> Self {
        self.families = families.to_vec();
        self
    }

    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    /// Machine and container identity tags for `spec`.
    pub fn default_tags(&self, spec: &ContainerSpec) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        tags.insert(series::TAG_MACHINE.to_string(), self.machine_name.clone());
        tags.insert(
            series::TAG_CONTAINER_NAME.to_string(),
            spec.display_name().to_string(),
        );
        tags
    }

    /// All points describing one stats sample of one container.
    pub fn container_stats_to_points(
        &self,
        spec: &ContainerSpec,
        stats: &ContainerStats,
    ) -> Result<Vec<Point>, TranslateError> {
        let mut points = Vec::new();
        for family in &self.families {
            points.extend(family.points(spec, stats)?);
        }
        self.tag_points(spec, &mut points);
        Ok(points)
    }

    /// Stamp common tags, then the container's labels, onto every point.
    pub fn tag_points(&self, spec: &ContainerSpec, points: &mut [Point]) {
        let common = self.default_tags(spec);
        for point in points.iter_mut() {
            point.add_tags(&common);
            point.add_tags(&spec.labels);
        }
    }
}
