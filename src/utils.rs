use std::path::Path;
use walkdir::WalkDir;

/// Compute total size of a directory recursively.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Get size of a file or directory.
pub fn entry_size(path: &Path) -> u64 {
    if path.is_dir() {
        dir_size(path)
    } else {
        path.symlink_metadata().map(|m| m.len()).unwrap_or(0)
    }
}

/// Remove a file or directory. Returns bytes freed on success.
pub fn safe_remove(path: &Path) -> Result<u64, std::io::Error> {
    let size = entry_size(path);
    let meta = path.symlink_metadata()?;
    if meta.is_dir() {
        std::fs::remove_dir_all(path)?;
    } else {
        std::fs::remove_file(path)?;
    }
    Ok(size)
}

/// Parse human-readable size string ("100MB") into bytes.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let lower = s.trim().to_ascii_lowercase();
    let (num_str, multiplier) = if let Some(n) = lower.strip_suffix("gb") {
        (n, 1_073_741_824u64)
    } else if let Some(n) = lower.strip_suffix("mb") {
        (n, 1_048_576)
    } else if let Some(n) = lower.strip_suffix("kb") {
        (n, 1_024)
    } else if let Some(n) = lower.strip_suffix('b') {
        (n, 1)
    } else {
        // assume bytes if no suffix
        (lower.as_str(), 1)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: '{}'", num_str.trim()))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    Ok((num * multiplier as f64) as u64)
}

/// Format byte count as human-readable string.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.2} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn parse_size_accepts_suffixes() {
        assert_eq!(parse_size("1KB").unwrap(), 1_024);
        assert_eq!(parse_size("100MB").unwrap(), 100 * 1_048_576);
        assert_eq!(parse_size("2gb").unwrap(), 2 * 1_073_741_824);
        assert_eq!(parse_size("512").unwrap(), 512);
        assert!(parse_size("junk").is_err());
    }

    #[test]
    fn format_size_picks_unit() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2_097_152), "2.00 MB");
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
    }

    #[test]
    fn dir_size_sums_files() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let mut f = std::fs::File::create(sub.join("a.bin")).unwrap();
        f.write_all(&[0u8; 300]).unwrap();
        let mut g = std::fs::File::create(dir.path().join("b.bin")).unwrap();
        g.write_all(&[0u8; 200]).unwrap();

        assert_eq!(dir_size(dir.path()), 500);
        assert_eq!(entry_size(dir.path()), 500);
        assert_eq!(entry_size(&sub.join("a.bin")), 300);
    }

    #[test]
    fn safe_remove_reports_freed_bytes() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("victim.bin");
        std::fs::write(&file, [0u8; 1000]).unwrap();

        let freed = safe_remove(&file).unwrap();
        assert_eq!(freed, 1000);
        assert!(!file.exists());
        assert!(safe_remove(&file).is_err());
    }
}
