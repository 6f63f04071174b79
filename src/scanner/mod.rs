use crate::error::{EcgScanError, Result};
use ecg_scan_common::intake::is_image_mime;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 解析対象ファイル
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
    pub size: u64,
}

impl ImageFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .map_err(|_| EcgScanError::FileNotFound(path.display().to_string()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mime = guess_mime(path);

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime,
            size: meta.len(),
        })
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path)
            .map_err(|e| EcgScanError::ImageLoad(format!("{}: {}", self.path.display(), e)))
    }
}

/// 拡張子からMIMEタイプを推定（不明なら application/octet-stream）
fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// ファイル1件、またはフォルダ直下の画像を列挙
///
/// ファイルを直接指定した場合は拡張子で絞り込まない（受付チェックで拒否する）。
pub fn scan_path(path: &Path) -> Result<Vec<ImageFile>> {
    if !path.exists() {
        return Err(EcgScanError::FileNotFound(path.display().to_string()));
    }

    if path.is_file() {
        return Ok(vec![ImageFile::from_path(path)?]);
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(path)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let entry_path = entry.path();
        if !entry_path.is_file() {
            continue;
        }

        if is_image_mime(&guess_mime(entry_path)) {
            images.push(ImageFile::from_path(entry_path)?);
        }
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("scan.svg")), "image/svg+xml");
        assert_eq!(guess_mime(Path::new("scan.avif")), "image/avif");
        assert_eq!(guess_mime(Path::new("scan.tif")), "image/tiff");
        assert_eq!(guess_mime(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_mime(Path::new("noext")), "application/octet-stream");
    }

    /// svg / avif / tiff も画像として扱う（単体指定・フォルダ指定とも）
    #[test]
    fn test_scan_accepts_less_common_image_types() {
        let dir = tempdir().unwrap();
        for name in ["a.svg", "b.avif", "c.tiff", "d.ico"] {
            fs::write(dir.path().join(name), b"dummy").unwrap();
        }
        fs::write(dir.path().join("e.pdf"), b"dummy").unwrap();

        let result = scan_path(dir.path()).unwrap();
        let names: Vec<_> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.svg", "b.avif", "c.tiff", "d.ico"]);
        assert!(result.iter().all(|i| is_image_mime(&i.mime)));

        let single = scan_path(&dir.path().join("a.svg")).unwrap();
        assert_eq!(single[0].mime, "image/svg+xml");
        assert!(ecg_scan_common::validate_upload(&single[0].file_name, &single[0].mime, single[0].size).is_ok());
    }

    #[test]
    fn test_scan_path_not_found() {
        let result = scan_path(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(EcgScanError::FileNotFound(_))));
    }

    #[test]
    fn test_scan_folder_filters_and_sorts() {
        let dir = tempdir().unwrap();

        File::create(dir.path().join("c_ecg.png")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("a.JPG")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("b.gif")).unwrap().write_all(b"dummy").unwrap();
        File::create(dir.path().join("readme.txt")).unwrap().write_all(b"text").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        File::create(dir.path().join("nested").join("d.png")).unwrap();

        let result = scan_path(dir.path()).unwrap();
        let names: Vec<_> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.JPG", "b.gif", "c_ecg.png"]);
        assert_eq!(result[0].mime, "image/jpeg");
        assert_eq!(result[0].size, 5);
    }

    #[test]
    fn test_scan_single_file_keeps_non_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let result = scan_path(&path).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].mime, "text/plain");
    }

    #[test]
    fn test_read_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.png");
        fs::write(&path, [0u8, 1, 2]).unwrap();

        let image = ImageFile::from_path(&path).unwrap();
        assert_eq!(image.read_bytes().unwrap(), vec![0, 1, 2]);
        assert_eq!(image.size, 3);
    }
}
