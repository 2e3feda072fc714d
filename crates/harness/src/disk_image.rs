//! Placeholder disk images.
//!
//! The image is never attached to a hypervisor; it only stands in for the
//! artifact a real benchmark would create. `qemu-img` is tried first and a
//! zero-filled file is written when the tool is not installed.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};
use virtbench_core::DiskImageConfig;

use crate::error::{HarnessError, Result};

/// How the placeholder was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Created by the external image tool
    Qcow2,
    /// Zero-filled stand-in written directly
    ZeroFilled,
}

/// Something that can create a placeholder image at a path.
pub trait DiskImageProvisioner: Send + Sync {
    /// Create the image at `path`.
    fn provision(&self, path: &Path) -> Result<ImageKind>;
}

/// Runs `<tool> create -f qcow2 <path> <size>`, falling back to a
/// zero-filled file when the tool cannot be found.
#[derive(Debug, Clone)]
pub struct QemuImgProvisioner {
    tool: String,
    size: String,
    fallback_bytes: u64,
}

impl QemuImgProvisioner {
    /// Build from the `[disk_image]` config section.
    pub fn new(config: &DiskImageConfig) -> Self {
        Self {
            tool: config.tool.clone(),
            size: config.size.clone(),
            fallback_bytes: config.fallback_bytes,
        }
    }
}

impl DiskImageProvisioner for QemuImgProvisioner {
    fn provision(&self, path: &Path) -> Result<ImageKind> {
        info!(target: "virtbench::disk", path = %path.display(), tool = %self.tool, "Creating disk image");

        let output = Command::new(&self.tool)
            .args(["create", "-f", "qcow2"])
            .arg(path)
            .arg(&self.size)
            .output();

        match output {
            Ok(out) if out.status.success() => {
                info!(target: "virtbench::disk", path = %path.display(), "Disk image created");
                Ok(ImageKind::Qcow2)
            }
            Ok(out) => Err(HarnessError::ImageToolFailed {
                tool: self.tool.clone(),
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    target: "virtbench::disk",
                    tool = %self.tool,
                    "Disk image tool not found, writing zero-filled placeholder"
                );
                write_zero_filled(path, self.fallback_bytes)?;
                info!(
                    target: "virtbench::disk",
                    path = %path.display(),
                    bytes = self.fallback_bytes,
                    "Placeholder image written"
                );
                Ok(ImageKind::ZeroFilled)
            }
            Err(source) => Err(HarnessError::ImageToolSpawn {
                tool: self.tool.clone(),
                source,
            }),
        }
    }
}

/// Write a zero-filled file of `bytes` length, replacing any existing file.
pub fn write_zero_filled(path: &Path, bytes: u64) -> Result<()> {
    let io_err = |source| HarnessError::ImageIo {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    file.set_len(bytes).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    Ok(())
}

/// Best-effort removal of a placeholder. A missing file is not an error.
///
/// Returns whether the path is gone afterwards.
pub fn remove_placeholder(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(target: "virtbench::disk", path = %path.display(), "Placeholder removed");
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => true,
        Err(e) => {
            warn!(target: "virtbench::disk", path = %path.display(), error = %e, "Could not remove placeholder");
            false
        }
    }
}

/// A provisioned placeholder, removed when dropped.
#[derive(Debug)]
pub struct PlaceholderImage {
    path: PathBuf,
    kind: ImageKind,
}

impl PlaceholderImage {
    /// Provision an image at `path`.
    ///
    /// On failure any partial file is removed before the error is returned.
    pub fn provision(provisioner: &dyn DiskImageProvisioner, path: &Path) -> Result<Self> {
        match provisioner.provision(path) {
            Ok(kind) => Ok(Self {
                path: path.to_path_buf(),
                kind,
            }),
            Err(e) => {
                remove_placeholder(path);
                Err(e)
            }
        }
    }

    /// Image location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How the image was produced.
    pub fn kind(&self) -> ImageKind {
        self.kind
    }
}

impl Drop for PlaceholderImage {
    fn drop(&mut self) {
        remove_placeholder(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Failing;

    impl DiskImageProvisioner for Failing {
        fn provision(&self, path: &Path) -> Result<ImageKind> {
            std::fs::write(path, b"partial").unwrap();
            Err(HarnessError::ImageToolFailed {
                tool: "fake".to_string(),
                path: path.to_path_buf(),
                stderr: "boom".to_string(),
            })
        }
    }

    fn missing_tool_config() -> DiskImageConfig {
        DiskImageConfig {
            tool: "virtbench-no-such-image-tool".to_string(),
            size: "2G".to_string(),
            fallback_bytes: 4096,
        }
    }

    #[test]
    fn missing_tool_falls_back_to_zero_filled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("virtio_disk.img");
        let provisioner = QemuImgProvisioner::new(&missing_tool_config());

        let kind = provisioner.provision(&path).unwrap();
        assert_eq!(kind, ImageKind::ZeroFilled);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 4096);
        assert!(bytes.iter().all(|b| *b == 0));
    }

    #[test]
    fn fallback_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("virtio_disk.img");
        std::fs::write(&path, vec![0xAB; 10_000]).unwrap();

        write_zero_filled(&path, 16).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![0u8; 16]);
    }

    #[test]
    fn fallback_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/disk.img");
        let err = write_zero_filled(&path, 16).unwrap_err();
        assert!(matches!(err, HarnessError::ImageIo { .. }));
    }

    #[test]
    fn guard_removes_image_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emulated_disk.img");
        let provisioner = QemuImgProvisioner::new(&missing_tool_config());

        let image = PlaceholderImage::provision(&provisioner, &path).unwrap();
        assert!(image.path().exists());
        assert_eq!(image.kind(), ImageKind::ZeroFilled);
        drop(image);
        assert!(!path.exists());
    }

    #[test]
    fn failed_provision_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("virtio_disk.img");

        let err = PlaceholderImage::provision(&Failing, &path).unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert!(!path.exists());
    }

    #[test]
    fn removing_missing_placeholder_is_fine() {
        let dir = TempDir::new().unwrap();
        assert!(remove_placeholder(&dir.path().join("never-created.img")));
    }
}
