use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated data directory plus a command builder pointed at it
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    /// Build a `dailies` command bound to this environment's data dir
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("dailies").expect("dailies binary");
        cmd.arg("--data-dir").arg(self.dir.path());
        cmd.env_remove("DAILIES_DATA_DIR");
        cmd
    }

    /// Seed the persisted snapshot before a run
    pub fn write_state(&self, json: &str) {
        fs::write(self.dir.path().join("tracker_state.json"), json).expect("write state");
    }

    /// Read back the persisted snapshot
    pub fn read_state(&self) -> serde_json::Value {
        let content =
            fs::read_to_string(self.dir.path().join("tracker_state.json")).expect("read state");
        serde_json::from_str(&content).expect("parse state")
    }

    /// Seed the configuration file
    pub fn write_config(&self, toml: &str) {
        fs::write(self.dir.path().join("dailies.toml"), toml).expect("write config");
    }
}
