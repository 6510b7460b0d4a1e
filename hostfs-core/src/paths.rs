//! Conversion between the portable ("normalized") path form and the form the
//! host OS expects ("denormalized").
//!
//! The normalized form uses `/` as its only separator and never contains a
//! doubled separator. On Windows-like hosts a doubled separator in the input
//! (as in UNC and device paths) is recorded as `:` instead.

use crate::host::HostOs;

/// Collapses every run of `/` into a single `/`.
fn collapse_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_sep = false;
    for c in path.chars() {
        let is_sep = c == '/';
        if !(is_sep && prev_sep) {
            out.push(c);
        }
        prev_sep = is_sep;
    }
    out
}

/// Converts a host path to the normalized form.
///
/// Backslashes become `/`. On [`HostOs::Windows`] each doubled separator of
/// that text becomes `:`, pairing left to right. Any separator run that
/// remains is collapsed to a single `/`.
///
/// Runs of three or more separators are handled in one pass rather than by
/// repeated pair replacement: on Windows `a///b` becomes `a:/b`, and on POSIX
/// every run collapses completely, so `a///b` becomes `a/b`.
pub fn normalize_path(os: HostOs, path: &str) -> String {
    let forward = path.replace('\\', "/");
    match os {
        HostOs::Windows => collapse_separators(&forward.replace("//", ":")),
        HostOs::Posix => collapse_separators(&forward),
    }
}

/// Converts a normalized path to the form the host OS expects.
///
/// [`HostOs::Windows`] swaps `/` for `\`; [`HostOs::Posix`] swaps `:` for
/// `/`.
pub fn denormalize_path(os: HostOs, path: &str) -> String {
    match os {
        HostOs::Windows => path.replace('/', "\\"),
        HostOs::Posix => path.replace(':', "/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_normalize_rewrites_and_collapses() {
        assert_eq!(normalize_path(HostOs::Posix, "/a/b"), "/a/b");
        assert_eq!(normalize_path(HostOs::Posix, "/a//b"), "/a/b");
        assert_eq!(normalize_path(HostOs::Posix, "a\\b\\\\c"), "a/b/c");
        assert_eq!(normalize_path(HostOs::Posix, "///"), "/");
        assert_eq!(normalize_path(HostOs::Posix, "a///b"), "a/b");
        assert_eq!(normalize_path(HostOs::Posix, "a\\\\/b"), "a/b");
        assert_eq!(normalize_path(HostOs::Posix, "sd:/x"), "sd:/x");
    }

    #[test]
    fn posix_denormalize_swaps_colons() {
        assert_eq!(denormalize_path(HostOs::Posix, "/a/b"), "/a/b");
        assert_eq!(denormalize_path(HostOs::Posix, "/media/usb:file.bin"), "/media/usb/file.bin");
    }

    #[test]
    fn posix_plain_paths_survive_a_round_trip() {
        for p in ["/a/b", "/", "relative/dir/file.txt"] {
            let round = denormalize_path(HostOs::Posix, &normalize_path(HostOs::Posix, p));
            assert_eq!(round, p);
        }
    }

    #[test]
    fn windows_normalize_uses_forward_slashes() {
        assert_eq!(normalize_path(HostOs::Windows, "C:\\Users\\me"), "C:/Users/me");
        assert_eq!(normalize_path(HostOs::Windows, "C:/already/fine"), "C:/already/fine");
    }

    #[test]
    fn windows_normalize_marks_doubled_separators() {
        assert_eq!(normalize_path(HostOs::Windows, "\\\\server\\share"), ":server/share");
        assert_eq!(normalize_path(HostOs::Windows, "C:\\a\\\\b"), "C:/a:b");
        assert_eq!(normalize_path(HostOs::Windows, "a///b"), "a:/b");
    }

    #[test]
    fn windows_denormalize_uses_backslashes() {
        assert_eq!(denormalize_path(HostOs::Windows, "C:/Users/me"), "C:\\Users\\me");
        assert_eq!(denormalize_path(HostOs::Windows, "no_separators"), "no_separators");
    }

    #[test]
    fn collapse_keeps_single_separators() {
        assert_eq!(collapse_separators(""), "");
        assert_eq!(collapse_separators("a/b/"), "a/b/");
        assert_eq!(collapse_separators("//a////b"), "/a/b");
    }
}
