//! Bind path mapping between the client and daemon filesystem namespaces.
//!
//! A bind expression has the shape `source:target[:mode]`. Only `source` is
//! translated; `target` and `mode` are container-side and pass through.
//!
//! ## Namespaces
//!
//! ```text
//! Windows client      C:\Users\me          \\wsl.localhost\Ubuntu\home\me
//!                          │                         │
//! daemon view         /mnt/host/c/Users/me   /mnt/wsl/Ubuntu/home/me
//!                          │                         │
//! WSL client (Ubuntu) /mnt/c/Users/me        /home/me
//! ```
//!
//! Mapping never fails. Anything the mapper does not recognize is returned
//! unchanged so a path is never corrupted into something else.

use crate::context::{
    HOST_MOUNT_ROOT, MOUNT_ROOT, RewriteContext, RewriteDirection, WSL_MOUNT_ROOT,
};

/// Drive used when the bare host bridge (`/mnt/host`) is mapped to Windows.
pub const DEFAULT_DRIVE: &str = "c";

/// UNC prefixes (lowercase, slash-normalized) addressing a WSL distro from Windows.
const WSL_UNC_PREFIXES: [&str; 2] = ["//wsl.localhost/", "//wsl$/"];

/// UNC host used when handing WSL paths back to Windows clients.
const WSL_UNC_HOST: &str = "//wsl.localhost";

/// Maps a bind expression (or a bare mount source) for the given context.
#[must_use]
pub fn map_path(binding: &str, ctx: &RewriteContext) -> String {
    let result = map_binding(binding, ctx);

    tracing::debug!(
        direction = %ctx.direction(),
        windows = ctx.is_windows_host(),
        distro = ctx.distro_name(),
        binding,
        base = ctx.base_path(),
        result = %result,
        "mapped bind path"
    );

    result
}

fn map_binding(binding: &str, ctx: &RewriteContext) -> String {
    // Host resources such as //var/run/docker.sock are not bridged.
    if binding.starts_with("//") {
        return binding.to_string();
    }

    let normalized = binding.replace('\\', "/");
    let (source, rest) = match normalized.split_once(':') {
        Some((source, rest)) => (source, Some(rest)),
        None => (normalized.as_str(), None),
    };

    let mapped = if let Some(mount) = source.strip_prefix("/mnt/") {
        map_bridged_source(mount, binding, ctx).map(|source| join_binding(&source, rest))
    } else if ctx.is_windows_host() {
        Some(map_windows_binding(source, rest, ctx))
    } else if source.starts_with('/') {
        Some(format!("{}{normalized}", ctx.base_path()))
    } else {
        None
    };

    mapped.unwrap_or_else(|| binding.to_string())
}

/// Maps a source already living under `/mnt/`. `mount` excludes that prefix.
fn map_bridged_source(mount: &str, binding: &str, ctx: &RewriteContext) -> Option<String> {
    let (kind, segments) = match mount.split_once('/') {
        Some((kind, tail)) => (kind, tail.split('/').collect::<Vec<_>>()),
        None => (mount, Vec::new()),
    };

    match kind {
        "host" => Some(map_host_source(&segments, ctx)),
        "wsl" => map_wsl_source(&segments, binding, ctx),
        "" => None,
        other => match ctx.direction() {
            RewriteDirection::Request => Some(format!("{HOST_MOUNT_ROOT}/{mount}")),
            RewriteDirection::Response => {
                tracing::info!(
                    mount_type = other,
                    binding,
                    base = ctx.base_path(),
                    "no mapping for mount type in response"
                );
                None
            }
        },
    }
}

/// `/mnt/host/<drive>/<path>` becomes `<drive>:\<path>` on Windows and
/// `/mnt/<drive>/<path>` inside a distro.
fn map_host_source(segments: &[&str], ctx: &RewriteContext) -> String {
    match segments.split_first() {
        Some((drive, path)) if !drive.is_empty() => {
            if ctx.is_windows_host() {
                to_windows_separators(&format!("{drive}:/{}", path.join("/")))
            } else {
                format!("{MOUNT_ROOT}/{}", segments.join("/"))
            }
        }
        _ if ctx.is_windows_host() => format!("{DEFAULT_DRIVE}:\\"),
        _ => MOUNT_ROOT.to_string(),
    }
}

/// `/mnt/wsl/<distro>/<path>`: UNC on Windows responses, distro-local when
/// returning to the owning distro, bridged otherwise.
fn map_wsl_source(segments: &[&str], binding: &str, ctx: &RewriteContext) -> Option<String> {
    let Some((distro, path)) = segments.split_first().filter(|(d, _)| !d.is_empty()) else {
        tracing::debug!(binding, "wsl bridge path without distro");
        return None;
    };

    let response = ctx.direction() == RewriteDirection::Response;
    if ctx.is_windows_host() && response {
        Some(to_windows_separators(&format!(
            "{WSL_UNC_HOST}/{}",
            segments.join("/")
        )))
    } else if response && ctx.is_own_distro(distro) {
        Some(format!("/{}", path.join("/")))
    } else {
        Some(format!("{WSL_MOUNT_ROOT}/{}", segments.join("/")))
    }
}

/// Maps a non-`/mnt` source seen by a proxy on the Windows host.
fn map_windows_binding(source: &str, rest: Option<&str>, ctx: &RewriteContext) -> String {
    let lower = source.to_ascii_lowercase();
    // ASCII lowercasing keeps byte offsets, so slicing `source` is safe.
    if let Some(prefix) = WSL_UNC_PREFIXES.iter().find(|p| lower.starts_with(**p)) {
        let wsl_path = &source[prefix.len()..];
        return join_binding(&format!("{WSL_MOUNT_ROOT}/{wsl_path}"), rest);
    }

    // `C:\dir:/target` splits into `C` and `/dir:/target`.
    if let (Some(drive), Some(rest)) = (drive_letter(source), rest) {
        return format!(
            "{}/{}{rest}",
            ctx.base_path(),
            drive.to_ascii_lowercase()
        );
    }

    join_binding(&to_windows_separators(source), rest)
}

fn drive_letter(source: &str) -> Option<char> {
    let mut chars = source.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

fn join_binding(source: &str, rest: Option<&str>) -> String {
    match rest {
        Some(rest) => format!("{source}:{rest}"),
        None => source.to_string(),
    }
}

fn to_windows_separators(path: &str) -> String {
    path.replace('/', "\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RewriteDirection::{Request, Response};

    fn assert_maps(direction: RewriteDirection, distro: &str, source: &str, expected: &str) {
        let ctx = RewriteContext::new(direction, distro);
        let binding = format!("{source}:/test");
        assert_eq!(
            map_path(&binding, &ctx),
            format!("{expected}:/test"),
            "{direction} in {distro:?}: {source}"
        );
    }

    #[test]
    fn distro_requests() {
        assert_maps(Request, "Ubuntu", "/", "/mnt/wsl/Ubuntu/");
        assert_maps(Request, "Ubuntu", "/mnt/c", "/mnt/host/c");
        assert_maps(Request, "Ubuntu", "/home/user", "/mnt/wsl/Ubuntu/home/user");
        assert_maps(
            Request,
            "Alpine",
            "/mnt/wsl/Ubuntu/home/user",
            "/mnt/wsl/Ubuntu/home/user",
        );
    }

    #[test]
    fn distro_responses() {
        assert_maps(Response, "Ubuntu", "/mnt/host/c", "/mnt/c");
        assert_maps(Response, "Ubuntu", "/mnt/host", "/mnt");
        assert_maps(Response, "Ubuntu", "/mnt/wsl/Ubuntu/home/user", "/home/user");
        assert_maps(Response, "Ubuntu", "/mnt/wsl/Ubuntu", "/");
        assert_maps(
            Response,
            "Alpine",
            "/mnt/wsl/Ubuntu/home/user",
            "/mnt/wsl/Ubuntu/home/user",
        );
    }

    #[test]
    fn windows_drive_requests() {
        assert_maps(Request, "", "C:\\users\\user", "/mnt/host/c/users/user");
        assert_maps(Request, "", "C:\\Users\\User", "/mnt/host/c/Users/User");
        assert_maps(Request, "", "d:\\Data", "/mnt/host/d/Data");
    }

    #[test]
    fn windows_unc_requests() {
        assert_maps(Request, "", "\\\\wsl.localhost\\Ubuntu", "/mnt/wsl/Ubuntu");
        assert_maps(Request, "", "\\\\wsl.localhost\\Ubuntu\\", "/mnt/wsl/Ubuntu/");
        assert_maps(
            Request,
            "",
            "\\\\wsl.localhost\\Ubuntu\\user",
            "/mnt/wsl/Ubuntu/user",
        );
        assert_maps(
            Request,
            "",
            "\\\\wsl.localhost\\Ubuntu\\user\\",
            "/mnt/wsl/Ubuntu/user/",
        );
        assert_maps(
            Request,
            "",
            "\\\\wsl.localhost\\Ubuntu\\User\\Home",
            "/mnt/wsl/Ubuntu/User/Home",
        );
        assert_maps(
            Request,
            "",
            "\\\\wsl$\\Ubuntu\\user\\home",
            "/mnt/wsl/Ubuntu/user/home",
        );
        assert_maps(
            Request,
            "",
            "\\\\WSL.LOCALHOST\\Ubuntu\\user\\home",
            "/mnt/wsl/Ubuntu/user/home",
        );
        assert_maps(Request, "", "\\\\WSL$\\Ubuntu\\x", "/mnt/wsl/Ubuntu/x");
    }

    #[test]
    fn windows_plain_paths_use_backslashes() {
        assert_maps(Response, "", "/var/lib/x", "\\var\\lib\\x");
        assert_maps(Request, "", "/home/u", "\\home\\u");
    }

    #[test]
    fn windows_bridged_requests() {
        assert_maps(Request, "", "/mnt/c", "/mnt/host/c");
        assert_maps(
            Request,
            "",
            "/mnt/wsl/Ubuntu/user/home",
            "/mnt/wsl/Ubuntu/user/home",
        );
    }

    #[test]
    fn windows_responses() {
        assert_maps(Response, "", "/mnt/host/c", "c:\\");
        assert_maps(Response, "", "/mnt/host", "c:\\");
        assert_maps(Response, "", "/mnt/host/c/users/user", "c:\\users\\user");
        assert_maps(Response, "", "/mnt/host/D/Data", "D:\\Data");
        assert_maps(Response, "", "/mnt/wsl/Ubuntu", "\\\\wsl.localhost\\Ubuntu");
        assert_maps(Response, "", "/mnt/wsl/Ubuntu/", "\\\\wsl.localhost\\Ubuntu\\");
        assert_maps(
            Response,
            "",
            "/mnt/wsl/Ubuntu/user/home",
            "\\\\wsl.localhost\\Ubuntu\\user\\home",
        );
    }

    #[test]
    fn socket_is_not_mapped() {
        for distro in ["Ubuntu", ""] {
            assert_maps(Request, distro, "//var/run/docker.sock", "//var/run/docker.sock");
            assert_maps(Response, distro, "//var/run/docker.sock", "//var/run/docker.sock");
        }
    }

    #[test]
    fn unknown_mount_type_in_response_is_unchanged() {
        assert_maps(Response, "Ubuntu", "/mnt/d/data", "/mnt/d/data");
        assert_maps(Response, "", "/mnt/d/data", "/mnt/d/data");
    }

    #[test]
    fn named_volumes_are_unchanged() {
        let ctx = RewriteContext::new(Request, "Ubuntu");
        assert_eq!(map_path("cache:/var/cache", &ctx), "cache:/var/cache");

        let ctx = RewriteContext::new(Request, "");
        assert_eq!(map_path("cache:/var/cache", &ctx), "cache:/var/cache");
    }

    #[test]
    fn mode_is_preserved() {
        let ctx = RewriteContext::new(Request, "Ubuntu");
        assert_eq!(
            map_path("/home/user:/data:ro", &ctx),
            "/mnt/wsl/Ubuntu/home/user:/data:ro"
        );
    }

    #[test]
    fn bare_mount_source() {
        let ctx = RewriteContext::new(Request, "");
        assert_eq!(map_path("C:\\Users\\me", &ctx), "/mnt/host/c/Users/me");

        let ctx = RewriteContext::new(Response, "Ubuntu");
        assert_eq!(map_path("/mnt/wsl/Ubuntu/srv", &ctx), "/srv");
    }

    #[test]
    fn bare_drive_letter_is_not_a_drive() {
        let ctx = RewriteContext::new(Request, "");
        assert_eq!(map_path("C", &ctx), "C");
    }

    #[test]
    fn malformed_input_is_unchanged() {
        for distro in ["Ubuntu", ""] {
            for direction in [Request, Response] {
                let ctx = RewriteContext::new(direction, distro);
                assert_eq!(map_path("", &ctx), "");
                assert_eq!(map_path("/mnt/", &ctx), "/mnt/");
                assert_eq!(map_path("/mnt/wsl", &ctx), "/mnt/wsl");
                assert_eq!(map_path("/mnt/wsl/", &ctx), "/mnt/wsl/");
            }
        }
    }
}
