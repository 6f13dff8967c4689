//! Test helpers shared by the CLI unit and behaviour tests.

use std::fs;

use camdodge_core::Camera;
use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use tempfile::TempDir;

pub(super) const START: Coord<f64> = Coord { x: -73.98, y: 40.75 };
pub(super) const END: Coord<f64> = Coord { x: -73.97, y: 40.76 };

pub(super) fn midtown_camera() -> Camera {
    Camera::new("midtown", Coord { x: -73.975, y: 40.755 }, "traffic")
}

pub(super) fn direct_path() -> Vec<Coord<f64>> {
    vec![START, Coord { x: -73.975, y: 40.755 }, END]
}

pub(super) fn detour_path() -> Vec<Coord<f64>> {
    vec![START, Coord { x: -73.985, y: 40.758 }, END]
}

/// A temporary directory addressed through UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn write(&self, name: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write workspace file");
        path
    }
}
