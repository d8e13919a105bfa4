#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const APP_LINUX: &str = r#"
app: linux
category: os
name:
  en-US: Linux
  zh-CN: Linux操作系统
metrics:
  - name: cpu
    protocol: ssh
    priority: 0
    fields:
      - field: usage
        type: number
        unit: "%"
      - field: cores
        type: number
  - name: memory
    protocol: ssh
    priority: 1
    fields:
      - field: used
        type: number
        unit: MB
"#;

pub const PARAM_LINUX: &str = r#"
app: linux
param:
  - field: host
    type: host
    name:
      en-US: Target Host
      zh-CN: 目标主机
    required: true
  - field: port
    type: number
    name:
      en-US: Port
    required: true
    defaultValue: "22"
    range: "[0,65535]"
"#;

/// A seeded define tree on disk, with the environment pointed at it.
/// Keep the value alive for the duration of the test; tests that use it
/// must be `#[serial]` since the environment is process-global.
pub struct DefineDirs {
    root: TempDir,
    pub app_dir: PathBuf,
    pub param_dir: PathBuf,
}

impl DefineDirs {
    pub fn seeded() -> Self {
        let dirs = Self::empty();
        dirs.write_app("linux", APP_LINUX);
        dirs.write_param("linux", PARAM_LINUX);
        dirs
    }

    pub fn empty() -> Self {
        let root = TempDir::new().expect("tempdir");
        let app_dir = root.path().join("define").join("app");
        let param_dir = root.path().join("define").join("param");
        fs::create_dir_all(&app_dir).expect("app dir");
        fs::create_dir_all(&param_dir).expect("param dir");
        let dirs = DefineDirs {
            root,
            app_dir,
            param_dir,
        };
        dirs.activate();
        dirs
    }

    pub fn activate(&self) {
        env::set_var("MONITORHUB_DEFINE_APP_DIR", &self.app_dir);
        env::set_var("MONITORHUB_DEFINE_PARAM_DIR", &self.param_dir);
    }

    pub fn write_app(&self, app: &str, body: &str) {
        fs::write(self.app_dir.join(format!("app-{app}.yml")), body).expect("write app doc");
    }

    pub fn write_param(&self, app: &str, body: &str) {
        fs::write(self.param_dir.join(format!("param-{app}.yml")), body).expect("write param doc");
    }
}

/// Points the define environment at paths that do not exist, which
/// forces the bundled fallback.
pub fn activate_bundled_source() -> TempDir {
    let root = TempDir::new().expect("tempdir");
    env::set_var("MONITORHUB_DEFINE_APP_DIR", root.path().join("missing-app"));
    env::set_var(
        "MONITORHUB_DEFINE_PARAM_DIR",
        root.path().join("missing-param"),
    );
    root
}
