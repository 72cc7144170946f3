// Domain models

mod container;

pub use container::ContainerMetricSet;
