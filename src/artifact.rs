use std::{
    fs, io,
    path::Path,
    time::UNIX_EPOCH,
};

/// Next unused integer file name (without extension) for files of `extension` in `dir`
///
/// Existing files are ordered by creation time, falling back to modification time on
/// platforms that do not record it. The newest file with an integer stem is continued
/// from, and names already taken are skipped. An empty or missing directory starts at `1`.
pub fn next_file_name(dir: &Path, extension: &str) -> io::Result<String> {
    let extension = extension.trim_start_matches('.');

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(String::from("1")),
        Err(err) => return Err(err),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let metadata = entry.metadata()?;
        let born = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(UNIX_EPOCH);
        let number = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u64>().ok());
        files.push((born, number));
    }
    files.sort_by_key(|&(born, _)| born);

    let mut next = files
        .iter()
        .rev()
        .find_map(|&(_, number)| number)
        .map_or(files.len() as u64 + 1, |n| n + 1);
    while dir.join(format!("{next}.{extension}")).exists() {
        next += 1;
    }

    Ok(next.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_empty_dir_starts_at_one() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(next_file_name(&dir.path().join("nope"), ".csv").unwrap(), "1");
        assert_eq!(next_file_name(dir.path(), "csv").unwrap(), "1");
    }

    #[test]
    fn continues_after_existing_numbers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.csv"), "").unwrap();
        fs::write(dir.path().join("2.csv"), "").unwrap();
        fs::write(dir.path().join("5.txt"), "").unwrap();
        assert_eq!(next_file_name(dir.path(), ".csv").unwrap(), "3");
        assert_eq!(next_file_name(dir.path(), "txt").unwrap(), "6");
    }

    #[test]
    fn non_numeric_names_count_towards_the_next() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("heatmap.csv"), "").unwrap();
        fs::write(dir.path().join("2.csv"), "").unwrap();
        assert_eq!(next_file_name(dir.path(), "csv").unwrap(), "3");
    }
}
