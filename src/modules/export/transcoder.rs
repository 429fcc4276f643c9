use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, ChildStderr, ChildStdin, Command};
use tracing::debug;

use super::error::ExportError;

/// Owns a running ffmpeg child process. stdin feeds the image sequence,
/// stderr carries diagnostics, stdout is unused — the MP4 container cannot
/// be written to a pipe, so output goes to a temp path owned by the caller.
pub struct Transcoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<ChildStderr>,
}

impl Transcoder {
    /// Launch ffmpeg reading an image sequence from stdin at the given
    /// framerate and encoding H.264/yuv420p into `output`.
    pub fn spawn(ffmpeg_path: &str, framerate: f64, output: &Path) -> Result<Self, ExportError> {
        let mut cmd = Command::new(ffmpeg_path);
        cmd.arg("-y")
            .args(["-loglevel", "error"])
            .args(["-f", "image2pipe"])
            .args(["-framerate", &framerate.to_string()])
            .args(["-i", "pipe:0"])
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .arg(output);
        Self::spawn_command(cmd)
    }

    pub(crate) fn spawn_command(mut cmd: Command) -> Result<Self, ExportError> {
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(ExportError::ProcessStartup)?;

        let stdin = child.stdin.take();
        let stderr = child.stderr.take();

        Ok(Self {
            child,
            stdin,
            stderr,
        })
    }

    pub fn take_stdin(&mut self) -> ChildStdin {
        self.stdin.take().expect("transcoder stdin already taken")
    }

    pub fn take_stderr(&mut self) -> ChildStderr {
        self.stderr.take().expect("transcoder stderr already taken")
    }

    pub async fn wait(&mut self) -> std::io::Result<std::process::ExitStatus> {
        self.child.wait().await
    }

    /// OS pid while the process is alive, `None` once it has been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Kill the process and wait for it to actually die. Harmless if it
    /// has already exited.
    pub async fn terminate(&mut self) {
        if let Err(err) = self.child.start_kill() {
            debug!("transcoder kill signal not delivered: {}", err);
        }
        let _ = self.child.wait().await;
    }
}
