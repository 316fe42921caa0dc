use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::input::InputError;

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => InputError::MissingInput(path.display().to_string()),
        _ => InputError::Io(e),
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// First existing file among `stem.ext` and `stem.ext.gz` for each extension,
/// in the order given.
pub fn find_with_extensions(dir: &Path, stem: &str, exts: &[&str]) -> Option<PathBuf> {
    for ext in exts {
        let plain = dir.join(format!("{stem}.{ext}"));
        if plain.is_file() {
            return Some(plain);
        }
        let gz = dir.join(format!("{stem}.{ext}.gz"));
        if gz.is_file() {
            return Some(gz);
        }
    }
    None
}

/// `foo.json.gz` -> `json`, `foo.csv` -> `csv`.
pub fn logical_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let trimmed = name.strip_suffix(".gz").unwrap_or(name);
    let ext = Path::new(trimmed).extension()?.to_str()?;
    Some(ext.to_ascii_lowercase())
}
