/// Shared helpers for unit tests (temporary asset folders, mock renderer)

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::graphics_device::mock_graphics_device::{MockGraphicsDevice, MockState};
use crate::render::{Render, RenderConfig};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// A uniquely named folder under the system temp dir, removed on drop
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "tse_{}_{}_{}",
            tag,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a text file (creating parent folders) and return its path
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        self.write_bytes(relative, contents.as_bytes())
    }

    pub fn write_bytes(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Minimal vertex/fragment pair consuming positions only
pub const TRIVIAL_VERT: &str = "in vec3 InPosition;\nvoid main() {}\n";
pub const TRIVIAL_FRAG: &str = "void main() {}\n";

/// An initialized `Render` over a mock device, shaders under `root`
///
/// Every name in `shaders` gets a trivial shader folder ("default" always
/// does). The command log is cleared after init.
pub fn mock_render(root: &TempDir, shaders: &[&str]) -> (Render, Arc<Mutex<MockState>>) {
    for name in std::iter::once(&"default").chain(shaders) {
        root.write(&format!("{}/vert.glsl", name), TRIVIAL_VERT);
        root.write(&format!("{}/frag.glsl", name), TRIVIAL_FRAG);
    }
    let device = MockGraphicsDevice::new();
    let state = device.state();
    let mut render = Render::new(
        Box::new(device),
        RenderConfig {
            shader_root: root.path().to_path_buf(),
            hot_reload: false,
            width: 640,
            height: 480,
            ..Default::default()
        },
    );
    render.init().unwrap();
    state.lock().unwrap().clear_commands();
    (render, state)
}
