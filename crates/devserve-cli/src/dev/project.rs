//! Project type auto-detection.
//!
//! When `serve` is given neither a command nor a static directory, the
//! project kind is inferred from marker files and supplies a default run
//! command and watch set. Anything unrecognized falls back to serving the
//! directory statically.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Recognized project kinds, probed in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Django,
    Flask,
    Rust,
    PythonPackage,
    Python,
    Node,
    Static,
}

impl ProjectKind {
    /// Detect the project kind from marker files under `root`.
    pub fn detect(root: &Path) -> Self {
        let kind = if root.join("manage.py").is_file() {
            ProjectKind::Django
        } else if root.join("app.py").is_file() || root.join("main.py").is_file() {
            ProjectKind::Flask
        } else if root.join("Cargo.toml").is_file() {
            ProjectKind::Rust
        } else if root.join("pyproject.toml").is_file() || root.join("setup.py").is_file() {
            ProjectKind::PythonPackage
        } else if root.join("requirements.txt").is_file() {
            ProjectKind::Python
        } else if root.join("package.json").is_file() {
            ProjectKind::Node
        } else {
            ProjectKind::Static
        };
        debug!(?kind, root = %root.display(), "detected project type");
        kind
    }

    /// Default run command, if the kind has one.
    pub fn run_command(&self) -> Option<&'static str> {
        match self {
            ProjectKind::Django => Some("python manage.py runserver"),
            ProjectKind::Flask => Some("python app.py"),
            ProjectKind::Rust => Some("cargo run"),
            ProjectKind::PythonPackage => Some("python -m pip install -e ."),
            ProjectKind::Python => Some("python main.py"),
            ProjectKind::Node => Some("npm start"),
            ProjectKind::Static => None,
        }
    }

    /// Directories worth watching for this kind. Only the ones that exist
    /// under `root` are returned.
    pub fn watch_directories(&self, root: &Path) -> Vec<PathBuf> {
        let candidates: &[&str] = match self {
            ProjectKind::Django | ProjectKind::Flask => &[".", "templates", "static"],
            ProjectKind::Rust => &["src"],
            ProjectKind::PythonPackage => &[".", "src"],
            ProjectKind::Python | ProjectKind::Static => &["."],
            ProjectKind::Node => &[".", "src", "public"],
        };

        candidates
            .iter()
            .map(|dir| root.join(dir))
            .filter(|path| path.is_dir())
            .collect()
    }
}
