//! Mount option lookup used to recognise optical media.

use std::collections::HashMap;

/// File systems used by CD/DVD/BD media.
const OPTICAL_FILE_SYSTEMS: &[&str] = &["iso9660", "udf", "cdfs"];

pub fn is_optical_fs(fs_type: &str) -> bool {
    OPTICAL_FILE_SYSTEMS.contains(&fs_type.to_lowercase().as_str())
}

/// Mount point -> option string for every mounted file system.
#[cfg(target_os = "linux")]
pub fn mount_options() -> HashMap<String, String> {
    match std::fs::read_to_string("/proc/self/mounts") {
        Ok(raw) => parse_mount_table(&raw),
        Err(e) => {
            log::debug!("Could not read mount table: {}", e);
            HashMap::new()
        }
    }
}

#[cfg(not(target_os = "linux"))]
pub fn mount_options() -> HashMap<String, String> {
    HashMap::new()
}

/// Parse `/proc/self/mounts` lines: `device mount fstype options dump pass`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_mount_table(raw: &str) -> HashMap<String, String> {
    raw.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let _device = fields.next()?;
            let mount = fields.next()?;
            let _fs_type = fields.next()?;
            let options = fields.next()?;
            Some((unescape_mount(mount), options.to_string()))
        })
        .collect()
}

/// The kernel escapes spaces and tabs in mount paths as octal (`\040`).
fn unescape_mount(path: &str) -> String {
    path.replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\134", "\\")
}
