/// Level loader.
///
/// ## Sources (priority order):
///   1. A level file given on the command line
///   2. `levels/` directory (individual `.txt` files, sorted by name)
///   3. Built-in embedded levels
///
/// ## Level format (`.txt`):
///   One map row per line, symbols per `domain::tile`.
///   Trailing blank lines are dropped, short rows are padded with empty.
///   The level name is the file stem.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no rows or no columns")]
    Empty,
    #[error("level has no navigation targets")]
    NoTargets,
    #[error("could not read level {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runtime level data (owned strings, loaded from file or embedded).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<String>,
}

/// Parse a single level from text content.
pub fn parse_level(name: &str, content: &str) -> Result<LevelDef, LevelError> {
    let mut rows: Vec<String> = content.lines().map(|l| l.trim_end_matches('\r').to_string()).collect();

    while rows.last().map_or(false, |r| r.trim().is_empty()) {
        rows.pop();
    }

    let max_width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    if rows.is_empty() || max_width == 0 {
        return Err(LevelError::Empty);
    }

    for row in &mut rows {
        let len = row.chars().count();
        if len < max_width {
            row.extend(std::iter::repeat(' ').take(max_width - len));
        }
    }

    Ok(LevelDef { name: name.to_string(), rows })
}

pub fn load_level_file(path: &Path) -> Result<LevelDef, LevelError> {
    let content = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let def = parse_level(&name, &content)?;
    debug!("loaded level {:?} from {}", def.name, path.display());
    Ok(def)
}

/// Levels from a directory of `.txt` files; unreadable files are skipped.
pub fn load_from_directory(dir: &Path) -> Vec<LevelDef> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return vec![],
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |e| e == "txt"))
        .collect();
    paths.sort();

    paths.iter()
        .filter_map(|p| match load_level_file(p) {
            Ok(def) => Some(def),
            Err(e) => {
                warn!("skipping level: {e}");
                None
            }
        })
        .collect()
}

/// The directory's levels if it has any, else the embedded set.
pub fn available_levels(levels_dir: &Path) -> Vec<LevelDef> {
    let from_dir = if levels_dir.is_dir() { load_from_directory(levels_dir) } else { vec![] };
    if from_dir.is_empty() { embedded_levels() } else { from_dir }
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

pub fn embedded_levels() -> Vec<LevelDef> {
    vec![
        make_embedded("Gift Run", &[
            "                          ",
            "    @         #      @    ",
            "%%%%%%%H%%%%%%%%%%%H%%%%%%",
            "       H  --------  H     ",
            "       H         H  H  @  ",
            "   @   H      %%%H%%%%%%%%",
            "%%%%%%%%%%H      H        ",
            "          H------H    #   ",
            "    X     H      H  %%%%%%",
            "%%%%%%%%%%%%%%%%%%%%%%%%%%",
        ]),
        make_embedded("Ladder Well", &[
            "  @        H        @  ",
            "%%%%%%     H     %%%%%%",
            "     H-----H-----H     ",
            "     H     H     H     ",
            "  #  H  @  H  @  H  #  ",
            "%%%%%%%%%%%H%%%%%%%%%%%",
            "           H           ",
            "     X     H     @     ",
            "%%%%%%%%%%%%%%%%%%%%%%%",
        ]),
    ]
}

fn make_embedded(name: &str, map: &[&str]) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        rows: map.iter().map(|s| s.to_string()).collect(),
    }
}
