use crate::error::{PipelineError, PipelineResult};
use crate::model::ShipRow;
use crate::render::RenderedMap;
use log::{info, warn};
use std::ffi::OsString;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "ship_tracks_map.html";

/// Write the map next to `path` first and move it into place, so the target
/// is either the complete document or untouched.
pub fn write_map(map: &RenderedMap, path: &Path) -> PipelineResult<()> {
    let html = map.to_html()?;
    let tmp = temporary_sibling(path);

    let written = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(html.as_bytes())?;
            file.sync_all()
        })
        .and_then(|_| std::fs::rename(&tmp, path));

    if let Err(source) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(PipelineError::Write {
            source,
            path: path.to_path_buf(),
        });
    }

    info!("wrote {} bytes to {}", html.len(), path.display());
    Ok(())
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| path.as_os_str()));
    name.push(".tmp");
    path.with_file_name(name)
}

/// A fully written file parked next to its target, waiting to be moved in.
#[derive(Debug)]
pub struct Staged {
    tmp: PathBuf,
    target: PathBuf,
}

impl Staged {
    pub fn commit(self) -> PipelineResult<()> {
        std::fs::rename(&self.tmp, &self.target).map_err(|source| {
            let _ = std::fs::remove_file(&self.tmp);
            PipelineError::Write {
                source,
                path: self.target.clone(),
            }
        })
    }

    pub fn discard(self) {
        if let Err(e) = std::fs::remove_file(&self.tmp) {
            warn!("could not remove {}: {e}", self.tmp.display());
        }
    }
}

/// Write the sorted table as CSV beside `path` without touching `path` itself.
pub fn stage_csv(rows: &[ShipRow], path: &Path) -> PipelineResult<Staged> {
    let tmp = temporary_sibling(path);
    let export_error = |source: csv::Error| {
        let _ = std::fs::remove_file(&tmp);
        PipelineError::Export {
            source,
            path: path.to_path_buf(),
        }
    };

    let mut wtr = csv::Writer::from_path(&tmp).map_err(export_error)?;
    for row in rows {
        wtr.serialize(row).map_err(export_error)?;
    }
    wtr.flush().map_err(|e| export_error(e.into()))?;

    info!("exported {} rows to {}", rows.len(), path.display());
    Ok(Staged {
        tmp,
        target: path.to_path_buf(),
    })
}

/// Dump the sorted table as CSV.
pub fn write_csv(rows: &[ShipRow], path: &Path) -> PipelineResult<()> {
    stage_csv(rows, path)?.commit()
}
