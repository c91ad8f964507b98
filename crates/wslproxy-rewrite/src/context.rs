//! Per-body rewrite context.
//!
//! A [`RewriteContext`] captures everything the path mapper needs to know
//! about the two filesystem namespaces involved in one exchange: which way
//! the body travels, which mount bridge the client sees, and whether the
//! proxy itself runs on the Windows host.

use std::fmt;

/// Mount bridge exposing the Windows host filesystem.
pub const HOST_MOUNT_ROOT: &str = "/mnt/host";

/// Parent of the per-distro mount bridges (`/mnt/wsl/<distro>`).
pub const WSL_MOUNT_ROOT: &str = "/mnt/wsl";

/// Shared mount directory both namespaces agree on.
pub const MOUNT_ROOT: &str = "/mnt";

/// Direction of a body through the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewriteDirection {
    /// Client-authored body on its way to the daemon.
    Request,
    /// Daemon-authored body on its way back to the client.
    Response,
}

impl RewriteDirection {
    /// Short tag used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for RewriteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping context, built once per body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteContext {
    direction: RewriteDirection,
    base_path: String,
    is_windows_host: bool,
    distro_name: String,
}

impl RewriteContext {
    /// Creates a context for the given direction and WSL distro.
    ///
    /// An empty `distro_name` means the proxy runs on the Windows host and
    /// its clients see the host bridge (`/mnt/host`). Otherwise the proxy
    /// runs inside that distro and its clients see `/mnt/wsl/<distro>`.
    #[must_use]
    pub fn new(direction: RewriteDirection, distro_name: &str) -> Self {
        let is_windows_host = distro_name.is_empty();
        let base_path = if is_windows_host {
            HOST_MOUNT_ROOT.to_string()
        } else {
            format!("{WSL_MOUNT_ROOT}/{distro_name}")
        };

        Self {
            direction,
            base_path,
            is_windows_host,
            distro_name: distro_name.to_string(),
        }
    }

    /// Returns the direction of the body being rewritten.
    #[must_use]
    pub const fn direction(&self) -> RewriteDirection {
        self.direction
    }

    /// Returns the mount root visible to the client.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns true if the proxy runs on the Windows host.
    #[must_use]
    pub const fn is_windows_host(&self) -> bool {
        self.is_windows_host
    }

    /// Returns the WSL distro name, empty on the Windows host.
    #[must_use]
    pub fn distro_name(&self) -> &str {
        &self.distro_name
    }

    /// Returns true if `distro` owns this context's mount bridge.
    #[must_use]
    pub fn is_own_distro(&self, distro: &str) -> bool {
        !self.is_windows_host && self.distro_name == distro
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_distro_is_windows_host() {
        let ctx = RewriteContext::new(RewriteDirection::Request, "");
        assert!(ctx.is_windows_host());
        assert_eq!(ctx.base_path(), "/mnt/host");
        assert_eq!(ctx.distro_name(), "");
        assert!(!ctx.is_own_distro(""));
    }

    #[test]
    fn distro_context_uses_wsl_bridge() {
        let ctx = RewriteContext::new(RewriteDirection::Response, "Ubuntu");
        assert!(!ctx.is_windows_host());
        assert_eq!(ctx.base_path(), "/mnt/wsl/Ubuntu");
        assert_eq!(ctx.direction(), RewriteDirection::Response);
        assert!(ctx.is_own_distro("Ubuntu"));
        assert!(!ctx.is_own_distro("Alpine"));
    }

    #[test]
    fn direction_display() {
        assert_eq!(RewriteDirection::Request.to_string(), "request");
        assert_eq!(RewriteDirection::Response.to_string(), "response");
    }
}
