//! Runs the real `album-server` binary for tests that need process-level behavior.

use super::constants::*;
use super::fixtures::create_test_db_with_albums;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::{Child, Command};

/// A spawned `album-server` process over a seeded temp database
///
/// The process is killed on drop if it is still running.
pub struct ServerProcess {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    child: Child,
    _temp_db_dir: TempDir,
}

impl ServerProcess {
    /// Spawns the binary with `extra_args` appended to the db/bind/port arguments
    /// and waits for it to answer on `/`.
    pub async fn spawn(extra_args: &[&str]) -> Self {
        let (temp_db_dir, db_path) =
            create_test_db_with_albums().expect("Failed to create test database");

        // Reserve a free port, then release it for the child to bind
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .expect("Failed to find a free port")
            .port();

        let child = Command::new(env!("CARGO_BIN_EXE_album-server"))
            .arg("--db-path")
            .arg(&db_path)
            .args(["--bind-address", "127.0.0.1", "--port", &port.to_string()])
            .args(["--metrics-port", "0", "--logging-level", "none"])
            .args(extra_args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .expect("Failed to spawn album-server");

        let mut process = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            child,
            _temp_db_dir: temp_db_dir,
        };
        process.wait_for_ready().await;
        process
    }

    async fn wait_for_ready(&mut self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(PROCESS_READY_TIMEOUT_MS);

        loop {
            if let Ok(Some(status)) = self.child.try_wait() {
                panic!("album-server exited before becoming ready: {}", status);
            }
            if start.elapsed() > timeout {
                panic!(
                    "album-server did not become ready within {}ms",
                    PROCESS_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }

    /// Waits for the process to exit on its own.
    ///
    /// # Panics
    ///
    /// Panics if it is still running after `PROCESS_EXIT_TIMEOUT_MS`.
    pub async fn wait_for_exit(&mut self) -> ExitStatus {
        tokio::time::timeout(
            Duration::from_millis(PROCESS_EXIT_TIMEOUT_MS),
            self.child.wait(),
        )
        .await
        .expect("album-server did not exit in time")
        .expect("Failed to wait for album-server")
    }

    /// Returns the exit status if the process has already exited.
    pub fn try_exit_status(&mut self) -> Option<ExitStatus> {
        self.child
            .try_wait()
            .expect("Failed to poll album-server")
    }
}
