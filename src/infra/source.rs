//! Filesystem facts the parser needs: modification time, the show directory
//! and the list of candidate video files.

use chrono::{DateTime, Local, NaiveDateTime};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::error::{Error, Result};

static SEASON_DIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:season\s*(?:\(\s*[0-9]{4}\s*\)|[0-9]{1,4})|specials?)$")
        .expect("season directory pattern must compile")
});

#[derive(Debug, Deserialize)]
struct InfoJson {
    epoch: Option<f64>,
}

/// Local modification time of `path`.
///
/// A sibling `<stem>.info.json` carrying an `epoch` field takes precedence
/// over the filesystem timestamp.
pub fn modified_at(path: &Path) -> Result<NaiveDateTime> {
    if let Some(epoch) = info_json_epoch(path) {
        return Ok(epoch);
    }

    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::io(path, e))?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}

fn info_json_epoch(path: &Path) -> Option<NaiveDateTime> {
    let sidecar = path.with_extension("info.json");
    if !sidecar.is_file() {
        return None;
    }

    let info = fs::read_to_string(&sidecar)
        .map_err(|e| Error::io(&sidecar, e))
        .and_then(|content| {
            serde_json::from_str::<InfoJson>(&content).map_err(|source| Error::Json {
                path: sidecar.clone(),
                source,
            })
        });

    match info {
        Ok(InfoJson { epoch: Some(epoch) }) => {
            let time = DateTime::from_timestamp(epoch.trunc() as i64, 0)?;
            debug!(sidecar = %sidecar.display(), epoch, "using info.json epoch");
            Some(time.with_timezone(&Local).naive_local())
        }
        Ok(InfoJson { epoch: None }) => None,
        Err(e) => {
            warn!("Ignoring sidecar: {e}");
            None
        }
    }
}

/// Show directory for a file laid out as `root/show/Season (Year)/file`.
///
/// Returns the parent directory name, or the grandparent's when the parent
/// is a season folder.
pub fn show_dir_name(path: &Path) -> Option<String> {
    let parent = path.parent()?;
    let parent_name = parent.file_name()?.to_string_lossy();

    if SEASON_DIR.is_match(parent_name.trim()) {
        let grandparent = parent.parent()?.file_name()?;
        return Some(grandparent.to_string_lossy().into_owned());
    }
    Some(parent_name.into_owned())
}

/// Collects files under `dir_path` whose extension is in `extensions`
/// (case-insensitive), skipping hidden files. Sorted by path.
pub fn collect_video_files(
    dir_path: &Path,
    recurse: bool,
    extensions: &[String],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_video_files_helper(dir_path, recurse, extensions, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_video_files_helper(
    dir_path: &Path,
    recurse: bool,
    extensions: &[String],
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let entries = fs::read_dir(dir_path).map_err(|e| Error::io(dir_path, e))?;

    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir_path, e))?.path();

        let hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        if hidden {
            continue;
        }

        if path.is_file() {
            if has_extension(&path, extensions) {
                files.push(path);
            }
        } else if path.is_dir() && recurse {
            collect_video_files_helper(&path, recurse, extensions, files)?;
        }
    }

    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}
