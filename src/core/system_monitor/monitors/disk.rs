use std::io;
use std::path::Path;

use sysinfo::Disks;

use super::Monitor;
use crate::core::system_monitor::metrics::{MetricKey, Sample};
use crate::error::{ResmonError, Result};
use crate::platform::mounts;

/// File systems that never represent real storage.
const VIRTUAL_FILE_SYSTEMS: &[&str] = &[
    "tmpfs", "devtmpfs", "devfs", "squashfs", "overlay", "proc", "sysfs", "autofs", "ramfs",
];

/// One mounted file system as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub mount_point: String,
    pub fs_type: String,
    /// Comma-separated mount options, e.g. `rw,relatime` or `ro,cdrom`
    pub options: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSpace {
    pub used: u64,
    pub total: u64,
}

/// Host access needed by [`DiskMonitor`].
pub trait DiskSource {
    fn partitions(&mut self) -> Result<Vec<Partition>>;

    /// Called once per tick before any `usage` query.
    fn refresh(&mut self) {}

    fn usage(&mut self, mount_point: &str) -> io::Result<DiskSpace>;
}

/// Optical and virtual mounts are not tracked.
pub fn is_excluded_partition(partition: &Partition) -> bool {
    if partition.options.to_lowercase().contains("cdrom") {
        return true;
    }
    let fs_type = partition.fs_type.to_lowercase();
    VIRTUAL_FILE_SYSTEMS.contains(&fs_type.as_str())
}

/// Per-mount usage for the mounts discovered at startup.
pub struct DiskMonitor {
    source: Box<dyn DiskSource>,
    mounts: Vec<String>,
}

impl DiskMonitor {
    pub fn new(mut source: Box<dyn DiskSource>) -> Self {
        let mounts = match source.partitions() {
            Ok(partitions) => partitions
                .into_iter()
                .filter(|p| {
                    let excluded = is_excluded_partition(p);
                    if excluded {
                        log::debug!("Skipping mount {} ({})", p.mount_point, p.fs_type);
                    }
                    !excluded
                })
                .map(|p| p.mount_point)
                .fold(Vec::new(), |mut acc, mount| {
                    if !acc.contains(&mount) {
                        acc.push(mount);
                    }
                    acc
                }),
            Err(e) => {
                log::warn!("Disk enumeration failed: {}", e);
                Vec::new()
            }
        };

        Self { source, mounts }
    }

    pub fn mounts(&self) -> &[String] {
        &self.mounts
    }
}

impl Monitor for DiskMonitor {
    fn name(&self) -> &str {
        "disk"
    }

    fn metric_keys(&self) -> Vec<MetricKey> {
        self.mounts.iter().map(MetricKey::new).collect()
    }

    fn get_usage(&mut self) -> Result<Vec<Sample>> {
        self.source.refresh();

        let mut samples = Vec::with_capacity(self.mounts.len());
        let mut last_error = None;
        for mount in &self.mounts {
            match self.source.usage(mount) {
                Ok(space) => samples.push(Sample::bytes(MetricKey::new(mount), space.used, space.total)),
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    log::debug!("Permission denied reading {}, skipped", mount);
                }
                Err(e) => {
                    log::debug!("Disk usage for {} unavailable this tick: {}", mount, e);
                    last_error = Some(format!("disk usage for {}: {}", mount, e));
                }
            }
        }

        // A single unreadable mount only drops its own series
        match last_error {
            Some(message) if samples.is_empty() => Err(ResmonError::metric_collection(message)),
            _ => Ok(samples),
        }
    }
}

/// [`DiskSource`] backed by `sysinfo::Disks`.
pub struct SysinfoDiskSource {
    disks: Disks,
}

impl SysinfoDiskSource {
    pub fn new() -> Self {
        Self {
            disks: Disks::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoDiskSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskSource for SysinfoDiskSource {
    fn partitions(&mut self) -> Result<Vec<Partition>> {
        let options = mounts::mount_options();

        Ok(self
            .disks
            .iter()
            .map(|disk| {
                let mount_point = disk.mount_point().to_string_lossy().to_string();
                let fs_type = disk.file_system().to_string_lossy().to_string();
                let mut opts = options.get(&mount_point).cloned().unwrap_or_default();
                if mounts::is_optical_fs(&fs_type) {
                    if !opts.is_empty() {
                        opts.push(',');
                    }
                    opts.push_str("cdrom");
                }
                Partition {
                    mount_point,
                    fs_type,
                    options: opts,
                }
            })
            .collect())
    }

    fn refresh(&mut self) {
        self.disks.refresh(false);
    }

    fn usage(&mut self, mount_point: &str) -> io::Result<DiskSpace> {
        // Surfaces permission problems that sysinfo would report as zero space
        std::fs::metadata(mount_point)?;

        let disk = self
            .disks
            .iter()
            .find(|d| d.mount_point() == Path::new(mount_point))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} is no longer mounted", mount_point)))?;

        let total = disk.total_space();
        let available = disk.available_space();

        Ok(DiskSpace {
            used: total.saturating_sub(available),
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeDisks {
        partitions: Vec<Partition>,
        usage: HashMap<String, io::ErrorKind>,
    }

    impl DiskSource for FakeDisks {
        fn partitions(&mut self) -> Result<Vec<Partition>> {
            Ok(self.partitions.clone())
        }

        fn usage(&mut self, mount_point: &str) -> io::Result<DiskSpace> {
            match self.usage.get(mount_point) {
                Some(kind) => Err(io::Error::new(*kind, "fake failure")),
                None => Ok(DiskSpace { used: 25, total: 100 }),
            }
        }
    }

    fn partition(mount: &str, fs: &str, opts: &str) -> Partition {
        Partition {
            mount_point: mount.to_string(),
            fs_type: fs.to_string(),
            options: opts.to_string(),
        }
    }

    #[test]
    fn test_optical_and_virtual_mounts_excluded() {
        let source = FakeDisks {
            partitions: vec![
                partition("/", "ext4", "rw,relatime"),
                partition("/media/cd", "iso9660", "ro,CDROM"),
                partition("D:\\", "", "cdrom"),
                partition("/run", "tmpfs", "rw"),
                partition("/home", "btrfs", "rw"),
            ],
            usage: HashMap::new(),
        };
        let monitor = DiskMonitor::new(Box::new(source));
        assert_eq!(monitor.mounts(), &["/".to_string(), "/home".to_string()]);
    }

    #[test]
    fn test_permission_denied_mount_is_skipped() {
        let mut usage = HashMap::new();
        usage.insert("/secret".to_string(), io::ErrorKind::PermissionDenied);
        let source = FakeDisks {
            partitions: vec![partition("/", "ext4", "rw"), partition("/secret", "ext4", "rw")],
            usage,
        };
        let mut monitor = DiskMonitor::new(Box::new(source));

        let samples = monitor.get_usage().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].key, MetricKey::new("/"));
        assert_eq!(samples[0].percent, 25.0);
    }

    #[test]
    fn test_unmounted_disk_does_not_hide_others() {
        let mut usage = HashMap::new();
        usage.insert("/media/usb".to_string(), io::ErrorKind::NotFound);
        let source = FakeDisks {
            partitions: vec![
                partition("/", "ext4", "rw"),
                partition("/media/usb", "vfat", "rw"),
                partition("/home", "ext4", "rw"),
            ],
            usage,
        };
        let mut monitor = DiskMonitor::new(Box::new(source));

        let samples = monitor.get_usage().unwrap();
        let keys: Vec<&str> = samples.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["/", "/home"]);
    }

    #[test]
    fn test_every_mount_failing_fails_the_call() {
        let mut usage = HashMap::new();
        usage.insert("/".to_string(), io::ErrorKind::NotFound);
        let source = FakeDisks {
            partitions: vec![partition("/", "ext4", "rw")],
            usage,
        };
        let mut monitor = DiskMonitor::new(Box::new(source));
        assert!(monitor.get_usage().is_err());
    }
}
