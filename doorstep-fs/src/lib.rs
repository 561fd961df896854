//! Capability-based file output for Doorstep, built on `cap-std` and
//! `camino`.
//!
//! Paths given on the command line may be absolute or relative. Each is
//! split into an ambient base directory and a relative remainder so all
//! further access goes through a `cap-std` directory handle.
#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::debug;

/// Open the directory holding `path` and return it with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let (base, relative) = base_dir_and_relative(parent)?;
    let dir = if relative.as_str().is_empty() {
        base
    } else {
        base.open_dir(&relative)?
    };
    Ok((dir, file_name))
}

/// Create every missing directory above `path`.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = base_dir_and_relative(parent)?;
    if !relative.as_str().is_empty() {
        base.create_dir_all(&relative)?;
    }
    Ok(())
}

/// Replace the contents of `path` with `contents`.
///
/// The data is written to a hidden sibling first and renamed over the
/// target, so a concurrent reader sees either the old or the new document.
/// Missing parent directories are created.
pub fn write_replacing(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, file_name) = open_dir_and_file(path)?;
    let staging = format!(".{file_name}.partial");

    let mut file = dir.create(&staging)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    dir.rename(&staging, &dir, &file_name).inspect_err(|_| {
        // The rename error is what the caller needs; a leftover staging file
        // is only logged.
        if let Err(err) = dir.remove_file(&staging) {
            debug!("failed to remove staging file {staging}: {err}");
        }
    })
}

/// Split `parent` into an ambient base directory and a path relative to it.
///
/// Absolute paths resolve from their root (or Windows prefix); relative
/// paths resolve from the current directory.
pub fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let (base, relative) = split_root(parent)?;
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}

fn split_root(parent: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let base = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => return Ok((Utf8PathBuf::from("."), parent.to_owned())),
    };
    let relative = parent
        .strip_prefix(&base)
        .map_err(|_| io::Error::other(format!("failed to strip {base} from {parent}")))?
        .to_owned();
    Ok((base, relative))
}
