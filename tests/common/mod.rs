//! Shared helpers for integration tests.

#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway project directory with a manifest, optional config, and a
/// fake external installer on `PATH`.
pub struct TestProject {
    tmp: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tmp: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.tmp.path()
    }

    /// Write a file below the project directory, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.tmp.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.tmp.path().join(relative))?)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.tmp.path().join(relative).exists()
    }

    /// A `vbundle` command rooted at this project, with the project's `bin`
    /// directory prepended to `PATH` so fake installers are found.
    pub fn vbundle(&self) -> Command {
        let mut cmd = Command::cargo_bin("vbundle").expect("binary builds");
        cmd.arg("--root").arg(self.tmp.path()).arg("--no-progress");

        let bin = self.tmp.path().join("bin");
        let path = std::env::var("PATH").unwrap_or_default();
        cmd.env(
            "PATH",
            format!("{}:{path}", bin.display()),
        );
        cmd
    }

    /// Install a fake `pkgr` that writes a lockfile and vendor autoload
    /// metadata into the directory it is invoked in.
    #[cfg(unix)]
    pub fn add_fake_installer(&self) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let script = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "pkgr 3.1.0"
    exit 0
fi

mkdir -p vendor
cat > vendor/autoload.toml <<'EOF'
classmap = ["vendor/acme/http/src/Legacy"]

["psr-4"]
"Acme.Http" = ["vendor/acme/http/src"]
EOF

cat > package.lock <<'EOF'
version = 1

[[packages]]
name = "acme/http"
version = "2.4.0"
pretty_version = "2.4.0"
description = "HTTP client"
license = ["MIT"]

[[packages.requires]]
name = "acme/logging"
constraint = "^1.0"

[[packages]]
name = "acme/logging"
version = "1.2.0"
pretty_version = "1.2.0"
EOF
"#;

        let path = self.write("bin/pkgr", script)?;
        let mut permissions = std::fs::metadata(&path)?.permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&path, permissions)?;
        Ok(())
    }

    /// A failing fake `pkgr` that prints diagnostics and exits non-zero.
    #[cfg(unix)]
    pub fn add_broken_installer(&self) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let script = "#!/bin/sh\necho 'resolution failed: acme/http' >&2\nexit 1\n";
        let path = self.write("bin/pkgr", script)?;
        let mut permissions = std::fs::metadata(&path)?.permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&path, permissions)?;
        Ok(())
    }

    /// Seed a path repository with a package manifest.
    pub fn add_repository_package(
        &self,
        name: &str,
        version: &str,
        kind: &str,
        requires: &[(&str, &str)],
    ) -> Result<()> {
        let mut manifest = format!(
            "[package]\nname = \"{name}\"\nversion = \"{version}\"\ntype = \"{kind}\"\n"
        );
        if !requires.is_empty() {
            manifest.push_str("\n[require]\n");
            for (dep, constraint) in requires {
                manifest.push_str(&format!("\"{dep}\" = \"{constraint}\"\n"));
            }
        }
        self.write(
            &format!("packages/{name}/{version}/package.toml"),
            &manifest,
        )?;
        Ok(())
    }
}
