use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use skywriter_core::{DUMP_SIZE, is_dump_file, looks_like_dump};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::batch::BatchReport;

/// Public repositories known to carry amiibo dumps.
pub const DEFAULT_REPOS: &[&str] = &[
    "https://github.com/AmiiboDB/Amiibo.git",
    "https://github.com/HamletDuFromage/aio-switch-updater.git",
    "https://github.com/XorTroll/emuiibo.git",
    "https://github.com/CTCaer/hekate.git",
];

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Fails unless a `git` executable is on the `PATH`.
pub fn ensure_git() -> Result<()> {
    let status = Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("git is not installed or not in PATH")?;
    if !status.success() {
        bail!("git --version exited with {status}");
    }
    Ok(())
}

/// Clones each repository once, collects plausible dumps and copies the
/// content-unique ones into `output`.
///
/// A repository that fails or times out is logged and skipped; there is no retry.
pub fn fetch(output: &Path, repos: &[String], timeout: Duration) -> Result<BatchReport> {
    ensure_git()?;
    std::fs::create_dir_all(output)
        .with_context(|| format!("cannot create {}", output.display()))?;

    let workdir = tempfile::tempdir().context("cannot create clone directory")?;
    let mut report = BatchReport::default();
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for (index, url) in repos.iter().enumerate() {
        let clone_path = workdir.path().join(clone_dir_name(index, url));
        if let Err(e) = clone_repo(url, &clone_path, timeout) {
            report.errors += 1;
            warn!(%url, error = %e, "clone failed");
            continue;
        }

        let (found, rejected) = collect_unique(&clone_path, &mut seen, &mut unique);
        report.skipped += rejected;
        info!(%url, unique = found, rejected, "searched repository");
    }

    info!(count = unique.len(), "unique amiibo dumps found");
    copy_all(&unique, output, &mut report);

    info!(%report, output = %output.display(), "download complete");
    Ok(report)
}

/// Copies the content-unique dumps found anywhere under `src` into `output`.
///
/// `src` itself is only read.
pub fn stage_local(src: &Path, output: &Path) -> Result<BatchReport> {
    if !src.is_dir() {
        bail!("dump directory does not exist: {}", src.display());
    }
    std::fs::create_dir_all(output)
        .with_context(|| format!("cannot create {}", output.display()))?;

    let mut report = BatchReport::default();
    let mut unique = Vec::new();
    let (found, rejected) = collect_unique(src, &mut HashSet::new(), &mut unique);
    report.skipped += rejected;
    info!(dir = %src.display(), unique = found, rejected, "searched local dumps");

    copy_all(&unique, output, &mut report);
    Ok(report)
}

fn copy_all(dumps: &[PathBuf], output: &Path, report: &mut BatchReport) {
    for dump in dumps {
        match copy_into(dump, output) {
            Ok(Some(dest)) => {
                report.processed += 1;
                debug!(to = %dest.display(), "copied");
            }
            Ok(None) => {
                report.skipped += 1;
                debug!(file = %dump.display(), "already present");
            }
            Err(e) => {
                report.errors += 1;
                warn!(file = %dump.display(), error = %e, "copy failed");
            }
        }
    }
}

/// Directory for the `index`-th clone; unique even when repository names repeat.
fn clone_dir_name(index: usize, url: &str) -> String {
    format!("{index}-{}", repo_name(url))
}

/// The last URL segment without `.git`.
fn repo_name(url: &str) -> String {
    let last = url.trim_end_matches('/').rsplit('/').next().unwrap_or(url);
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        "repo".to_string()
    } else {
        name.to_string()
    }
}

fn clone_repo(url: &str, dest: &Path, timeout: Duration) -> Result<()> {
    info!(%url, "cloning");
    let mut child = Command::new("git")
        .args(["clone", "--quiet", "--depth", "1", "--single-branch", url])
        .arg(dest)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .context("failed to spawn git")?;

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            bail!("timed out after {}s", timeout.as_secs());
        }
        thread::sleep(POLL_INTERVAL);
    };

    if !status.success() {
        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }
        let stderr: String = stderr.trim().chars().take(200).collect();
        bail!("git clone exited with {status}: {stderr}");
    }
    Ok(())
}

/// Walks `root` for dump files that pass the sniff test and whose content
/// has not been seen before, appending them to `unique`.
///
/// Returns `(added, rejected)`; duplicates count as rejected.
fn collect_unique(
    root: &Path,
    seen: &mut HashSet<blake3::Hash>,
    unique: &mut Vec<PathBuf>,
) -> (usize, usize) {
    let mut added = 0;
    let mut rejected = 0;

    let candidates = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_dump_file(e.path()));

    for entry in candidates {
        // Skip reading anything far from the dump size.
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if size.abs_diff(DUMP_SIZE as u64) > 100 {
            rejected += 1;
            continue;
        }

        let Ok(bytes) = std::fs::read(entry.path()) else {
            rejected += 1;
            continue;
        };
        if !looks_like_dump(&bytes) {
            rejected += 1;
            continue;
        }

        if seen.insert(blake3::hash(&bytes)) {
            unique.push(entry.into_path());
            added += 1;
        } else {
            debug!(file = %entry.path().display(), "duplicate dump");
            rejected += 1;
        }
    }

    (added, rejected)
}

/// Copies `src` into `output` under its own name, or under
/// `<stem>-<hash8>.<ext>` when a different dump already took that name.
///
/// Returns `None` when a file with identical content is already in place.
fn copy_into(src: &Path, output: &Path) -> Result<Option<PathBuf>> {
    let name = src.file_name().context("dump has no file name")?;
    let bytes = std::fs::read(src).with_context(|| format!("cannot read {}", src.display()))?;
    let hash = blake3::hash(&bytes);

    let stem = src.file_stem().unwrap_or(name).to_string_lossy();
    let ext = src
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let candidates = [
        output.join(name),
        output.join(format!("{stem}-{}.{ext}", &hash.to_hex().as_str()[..8])),
    ];

    for dest in candidates {
        if !dest.exists() {
            std::fs::write(&dest, &bytes)
                .with_context(|| format!("cannot copy to {}", dest.display()))?;
            return Ok(Some(dest));
        }
        let existing =
            std::fs::read(&dest).with_context(|| format!("cannot read {}", dest.display()))?;
        if blake3::hash(&existing) == hash {
            return Ok(None);
        }
    }

    bail!("{} is taken by other dumps in {}", name.to_string_lossy(), output.display())
}
