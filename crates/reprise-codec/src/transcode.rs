//! External MP3 transcoding
//!
//! Runs an out-of-process encoder over scratch files:
//! `<executable> --preset <preset> <input.wav> <output.mp3>`.
//! The child's stdout and stderr are captured and attached to any error, and
//! a child that outlives its deadline is killed. On Unix the child leads its
//! own process group and the whole group is killed, so helpers it forked do
//! not survive it.

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Environment variable naming the encoder executable.
pub const TRANSCODER_PATH_ENV: &str = "LAME_PATH";

/// Encoder used when [`TRANSCODER_PATH_ENV`] is unset.
pub const DEFAULT_TRANSCODER_PATH: &str = "/opt/bin/lame";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long pipe readers may keep draining after a timeout kill.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Transcoder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderConfig {
    /// Path to the encoder executable
    pub executable: PathBuf,
    /// Value passed to `--preset`
    pub preset: String,
    /// Wall-clock budget for one invocation
    pub timeout: Duration,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_TRANSCODER_PATH),
            preset: "standard".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl TranscoderConfig {
    /// Defaults, with the executable taken from `LAME_PATH` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os(TRANSCODER_PATH_ENV).filter(|p| !p.is_empty()) {
            config.executable = PathBuf::from(path);
        }
        config
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// WAV to MP3 transcoder backed by an external process.
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    config: TranscoderConfig,
}

impl Transcoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    /// Transcode a complete WAV file into MP3 bytes.
    ///
    /// Scratch files live in a private temporary directory that is removed on
    /// every exit path.
    pub fn transcode(&self, wav: &[u8]) -> Result<Vec<u8>> {
        let scratch = tempfile::Builder::new()
            .prefix("reprise-transcode-")
            .tempdir()?;
        let input = scratch.path().join("input.wav");
        let output = scratch.path().join("output.mp3");
        fs::write(&input, wav)?;

        let mut command = Command::new(&self.config.executable);
        command
            .arg("--preset")
            .arg(&self.config.preset)
            .arg(&input)
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let started = Instant::now();
        let mut child = command.spawn().map_err(|source| CodecError::Spawn {
            executable: self.config.executable.clone(),
            source,
        })?;

        let readers = [child.stdout.take().map(drain), child.stderr.take().map(drain)];

        let status = wait_with_deadline(&mut child, started + self.config.timeout)?;
        let log = match status {
            Some(_) => collect_log(readers, None),
            // Something outside the group may still hold the pipes open.
            None => collect_log(readers, Some(Instant::now() + DRAIN_GRACE)),
        };

        match status {
            None => {
                tracing::warn!(
                    executable = %self.config.executable.display(),
                    timeout = ?self.config.timeout,
                    "transcoder timed out, killed"
                );
                Err(CodecError::TranscodeTimeout {
                    after: self.config.timeout,
                    log,
                })
            }
            Some(status) if !status.success() => {
                tracing::warn!(code = ?status.code(), "transcoder failed");
                Err(CodecError::Transcode {
                    status: status.code(),
                    log,
                })
            }
            Some(_) => {
                let encoded = fs::read(&output).map_err(|e| {
                    CodecError::Encoding(format!("transcoder produced no output: {}\n{}", e, log))
                })?;
                tracing::debug!(
                    input_bytes = wav.len(),
                    output_bytes = encoded.len(),
                    elapsed = ?started.elapsed(),
                    "transcoded"
                );
                Ok(encoded)
            }
        }
    }
}

/// `None` means the deadline passed and the child was killed.
fn wait_with_deadline(child: &mut Child, deadline: Instant) -> Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            kill_group(child);
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn kill_group(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: kill(2) only takes plain integers. The group id is the
            // child's pid because it was spawned with process_group(0), and
            // the child is not reaped yet, so the id cannot have been reused.
            unsafe {
                libc::kill(-pid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Join the pipe readers in order. Readers still blocked once `deadline`
/// passes are detached and their output is dropped.
fn collect_log(readers: [Option<JoinHandle<String>>; 2], deadline: Option<Instant>) -> String {
    let mut log = String::new();
    for handle in readers.into_iter().flatten() {
        if let Some(deadline) = deadline {
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(POLL_INTERVAL);
            }
            if !handle.is_finished() {
                tracing::debug!("transcoder pipe still open after kill, dropping its output");
                continue;
            }
        }
        if let Ok(text) = handle.join() {
            log.push_str(&text);
        }
    }
    log
}
