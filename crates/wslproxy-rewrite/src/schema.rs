//! Docker API document shapes that carry bind paths.
//!
//! Field names follow Docker Engine API v1.43.
//! See: <https://docs.docker.com/engine/api/v1.43/>

use std::fmt;

/// `HostConfig` object of a container.
pub const HOST_CONFIG: &str = "HostConfig";
/// `source:target[:mode]` strings inside `HostConfig`.
pub const BINDS: &str = "Binds";
/// Mount records, either inside `HostConfig`, a container spec, or top-level.
pub const MOUNTS: &str = "Mounts";
/// Spec wrapped by services and tasks.
pub const SPEC: &str = "Spec";
/// Task template of a service spec.
pub const TASK_TEMPLATE: &str = "TaskTemplate";
/// Container spec of a task spec.
pub const CONTAINER_SPEC: &str = "ContainerSpec";
/// Mount record type.
pub const MOUNT_TYPE: &str = "Type";
/// Mount record source path.
pub const MOUNT_SOURCE: &str = "Source";
/// The only mount type whose source is a host path.
pub const BIND_MOUNT_TYPE: &str = "bind";

/// Entry point into a Docker API document.
///
/// Each variant names the object an endpoint sends or returns, and fixes
/// which nested fields hold bind paths:
///
/// | Schema | Paths |
/// |---|---|
/// | `ContainerSummary`, `ContainerConfig` | `HostConfig.Binds`, `HostConfig.Mounts`, `Mounts` |
/// | `ServiceSpec` | `TaskTemplate.ContainerSpec.Mounts` |
/// | `Service` | `Spec.TaskTemplate.ContainerSpec.Mounts` |
/// | `Task` | `Spec.ContainerSpec.Mounts` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// Container list entry or inspect result.
    ContainerSummary,
    /// Container create body.
    ContainerConfig,
    /// Service create/update body.
    ServiceSpec,
    /// Service inspect/list result.
    Service,
    /// Task inspect/list result.
    Task,
}

impl Schema {
    /// Returns the Docker type name of the schema.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ContainerSummary => "ContainerSummary",
            Self::ContainerConfig => "ContainerConfig",
            Self::ServiceSpec => "ServiceSpec",
            Self::Service => "Service",
            Self::Task => "Task",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
