//! Thin wrappers around the system `git` command
//!
//! Every wrapper echoes the command line, lets git write its own progress to
//! the inherited stdout/stderr, and reports the exit status. Output is never
//! parsed; callers only look at whether the command succeeded.
//!
//! Using the system git means SSH keys, credential helpers and
//! `url.<base>.insteadOf` rewrites from `~/.gitconfig` all apply.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Command;

use log::{debug, warn};

use crate::error::{Error, Result};

/// Exit status of one git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitStatus {
    /// The command line as it was echoed.
    pub command: String,
    /// Process exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl GitStatus {
    /// Whether git exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for GitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}", code),
            None => f.write_str("signal"),
        }
    }
}

/// Fetch all remotes of an existing mirror: `git -C <dir> remote update`
pub fn remote_update(repo_dir: &Path) -> Result<GitStatus> {
    run(vec![
        "-C".into(),
        repo_dir.into(),
        "remote".into(),
        "update".into(),
    ])
}

/// Check that a remote exists and answers: `git ls-remote --heads <url>`
///
/// Terminal prompts are disabled so that a repository requiring
/// credentials fails immediately instead of waiting for input.
pub fn ls_remote(url: &str) -> Result<GitStatus> {
    let mut command = git_command(&["ls-remote".into(), "--heads".into(), url.into()]);
    command.env("GIT_TERMINAL_PROMPT", "0");
    execute(command, "git ls-remote --heads ".to_string() + url)
}

/// Create a bare mirror: `git -C <parent> clone --mirror <url> <name>`
pub fn clone_mirror(url: &str, parent_dir: &Path, name: &str) -> Result<GitStatus> {
    run(vec![
        "-C".into(),
        parent_dir.into(),
        "clone".into(),
        "--mirror".into(),
        url.into(),
        name.into(),
    ])
}

/// Create a regular checkout: `git clone <url> <target>`
pub fn clone(url: &str, target_dir: &Path) -> Result<GitStatus> {
    run(vec!["clone".into(), url.into(), target_dir.into()])
}

/// Fast-forward a checkout: `git -C <dir> pull`
pub fn pull(repo_dir: &Path) -> Result<GitStatus> {
    run(vec!["-C".into(), repo_dir.into(), "pull".into()])
}

fn run(args: Vec<OsString>) -> Result<GitStatus> {
    let display = describe(&args);
    execute(git_command(&args), display)
}

fn git_command(args: &[OsString]) -> Command {
    let mut command = Command::new("git");
    command.args(args);
    command
}

fn describe(args: &[OsString]) -> String {
    let mut display = String::from("git");
    for arg in args {
        display.push(' ');
        display.push_str(&arg.to_string_lossy());
    }
    display
}

fn execute(mut command: Command, display: String) -> Result<GitStatus> {
    println!("Command: {}", display);
    let status = command.status().map_err(|e| Error::GitSpawn {
        command: display.clone(),
        message: e.to_string(),
    })?;

    let result = GitStatus {
        command: display,
        code: status.code(),
    };
    if result.success() {
        debug!("`{}` succeeded", result.command);
    } else {
        warn!("Error while running `{}`", result.command);
    }
    println!("Returncode: {}", result);
    Ok(result)
}
