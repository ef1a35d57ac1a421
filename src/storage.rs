use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use tracing::{debug, info};

use crate::common::{check_pixel_limit, CodecError, CodecResult};
use crate::package::{FileRecord, MAX_FILE_SIZE};

// Paths
//------------------------------------------------------------------------------

/// `path` itself when nothing exists there yet, otherwise the first free `<stem>_<n>.<ext>`
/// next to it, counting from 1.
pub fn available_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = path.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();
    (1..)
        .map(|n| path.with_file_name(format!("{stem}_{n}{ext}")))
        .find(|p| !p.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Whether the extension names an image format the `image` crate knows.
pub fn is_image_path(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok()
}

// Payload files
//------------------------------------------------------------------------------

/// Reads a file into a [`FileRecord`]. The size is checked from the metadata before any
/// content is read.
pub fn read_payload_file(path: &Path) -> CodecResult<FileRecord> {
    let size = fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(CodecError::FileTooLarge { size, limit: MAX_FILE_SIZE });
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or(CodecError::InvalidFormat("path has no file name"))?;
    let ext = path.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();

    debug!(?path, size, "Reading payload file");
    FileRecord::new(fs::read(path)?, name, ext)
}

/// Writes the record's bytes into `dir` under the record's name, numbering the file when the
/// name is taken. Only the last component of the name is used so records cannot escape `dir`.
pub fn write_payload_file(record: &FileRecord, dir: &Path) -> CodecResult<PathBuf> {
    let name = Path::new(record.name())
        .file_name()
        .ok_or(CodecError::InvalidFormat("file name has no final component"))?;

    fs::create_dir_all(dir)?;
    let path = available_path(&dir.join(name));
    fs::write(&path, record.data())?;

    info!(?path, size = record.data().len(), "Restored file");
    Ok(path)
}

// Images
//------------------------------------------------------------------------------

/// Saves the raster to `path`, or to a numbered sibling when `path` is taken. The format
/// follows the extension.
pub fn save_image(img: &RgbImage, path: &Path) -> CodecResult<PathBuf> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let path = available_path(path);
    img.save(&path)?;

    info!(?path, width = img.width(), height = img.height(), "Saved image");
    Ok(path)
}

/// Loads an image as RGB. The pixel limit is checked against the header dimensions before
/// the pixels are decoded.
pub fn load_image(path: &Path, ignore_pixel_limit: bool) -> CodecResult<RgbImage> {
    let (width, height) = image::image_dimensions(path)?;
    check_pixel_limit(width, height, ignore_pixel_limit)?;

    debug!(?path, width, height, "Loading image");
    Ok(image::open(path)?.to_rgb8())
}

// Text file next to the image, `<stem>_<suffix>.txt`, numbered when taken
fn write_sidecar(image_path: &Path, suffix: &str, contents: &str) -> CodecResult<PathBuf> {
    let stem =
        image_path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let path = available_path(&image_path.with_file_name(format!("{stem}_{suffix}.txt")));
    fs::write(&path, contents)?;
    debug!(?path, "Wrote sidecar file");
    Ok(path)
}

/// Dumps the digit string next to the image as `<stem>_digits.txt`.
pub fn save_digits(digits: &str, image_path: &Path) -> CodecResult<PathBuf> {
    write_sidecar(image_path, "digits", digits)
}

/// Saves text read from an image next to it as `<stem>_decoded.txt`.
pub fn save_decoded_text(text: &str, image_path: &Path) -> CodecResult<PathBuf> {
    write_sidecar(image_path, "decoded", text)
}

/// Records where a file read from an image was restored, as `<stem>_restored.txt` next to
/// the image.
pub fn save_restore_report(
    record: &FileRecord,
    restored: &Path,
    image_path: &Path,
) -> CodecResult<PathBuf> {
    let report = format!(
        "name: {}\nextension: {}\nsize: {}\nrestored to: {}\n",
        record.name(),
        record.ext(),
        record.data().len(),
        restored.display()
    );
    write_sidecar(image_path, "restored", &report)
}

#[cfg(test)]
mod storage_tests {
    use std::fs;

    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    use super::*;
    use crate::builder::ImageBuilder;
    use crate::common::Base;
    use crate::reader::ImageReader;

    #[test]
    fn test_available_path() -> CodecResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.png");
        assert_eq!(available_path(&path), path);

        fs::write(&path, b"")?;
        assert_eq!(available_path(&path), dir.path().join("out_1.png"));

        fs::write(dir.path().join("out_1.png"), b"")?;
        assert_eq!(available_path(&path), dir.path().join("out_2.png"));

        let bare = dir.path().join("README");
        fs::write(&bare, b"")?;
        assert_eq!(available_path(&bare), dir.path().join("README_1"));
        Ok(())
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("a.png")));
        assert!(is_image_path(Path::new("b.jpg")));
        assert!(!is_image_path(Path::new("c.txt")));
        assert!(!is_image_path(Path::new("d")));
    }

    #[test]
    fn test_payload_file_roundtrip() -> CodecResult<()> {
        let dir = tempdir()?;
        let input = dir.path().join("a.bin");
        fs::write(&input, [1u8, 2, 3])?;

        let record = read_payload_file(&input)?;
        assert_eq!(record.to_string(), "FILEINFO:a.bin:.bin:AQID");

        let out_dir = dir.path().join("restored");
        let first = write_payload_file(&record, &out_dir)?;
        let second = write_payload_file(&record, &out_dir)?;
        assert_eq!(first, out_dir.join("a.bin"));
        assert_eq!(second, out_dir.join("a_1.bin"));
        assert_eq!(fs::read(second)?, [1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_payload_file_without_extension() -> CodecResult<()> {
        let dir = tempdir()?;
        let input = dir.path().join("Makefile");
        fs::write(&input, b"all:")?;
        let record = read_payload_file(&input)?;
        assert_eq!((record.name(), record.ext()), ("Makefile", ""));
        Ok(())
    }

    #[test]
    fn test_payload_file_too_large() -> CodecResult<()> {
        let dir = tempdir()?;
        let input = dir.path().join("big.dat");
        let file = fs::File::create(&input)?;
        file.set_len(MAX_FILE_SIZE + 1)?;
        assert!(matches!(read_payload_file(&input), Err(CodecError::FileTooLarge { .. })));
        Ok(())
    }

    #[test]
    fn test_write_payload_file_stays_in_dir() -> CodecResult<()> {
        let dir = tempdir()?;
        let record: FileRecord = "FILEINFO:../../evil.sh:.sh:aGk=".parse()?;
        let path = write_payload_file(&record, dir.path())?;
        assert_eq!(path, dir.path().join("evil.sh"));
        Ok(())
    }

    #[test]
    fn test_image_roundtrip() -> CodecResult<()> {
        let dir = tempdir()?;
        let encoded = ImageBuilder::new(b"Hello from disk").base(Base::new(6)?).build()?;

        let path = save_image(encoded.image(), &dir.path().join("images").join("hello.png"))?;
        let again = save_image(encoded.image(), &path)?;
        assert_eq!(again, dir.path().join("images").join("hello_1.png"));

        let img = load_image(&path, false)?;
        assert_eq!(&img, encoded.image());
        let decoded = ImageReader::new(&img).read_text()?;
        assert_eq!(decoded.text(), "Hello from disk");

        let digits = save_digits(encoded.digits(), &path)?;
        assert_eq!(digits, dir.path().join("images").join("hello_digits.txt"));
        assert_eq!(fs::read_to_string(digits)?, encoded.digits());
        Ok(())
    }

    #[test]
    fn test_save_decoded_text() -> CodecResult<()> {
        let dir = tempdir()?;
        let image_path = dir.path().join("note.png");
        let encoded = ImageBuilder::new("Grüße".as_bytes()).base(Base::HEX).build()?;
        save_image(encoded.image(), &image_path)?;

        let decoded = ImageReader::new(&load_image(&image_path, false)?).read_text()?;
        let first = save_decoded_text(decoded.text(), &image_path)?;
        let second = save_decoded_text(decoded.text(), &image_path)?;
        assert_eq!(first, dir.path().join("note_decoded.txt"));
        assert_eq!(second, dir.path().join("note_decoded_1.txt"));
        assert_eq!(fs::read_to_string(first)?, "Grüße");
        Ok(())
    }

    #[test]
    fn test_save_restore_report() -> CodecResult<()> {
        let dir = tempdir()?;
        let record: FileRecord = "FILEINFO:a.bin:.bin:AQID".parse()?;
        let restored = write_payload_file(&record, dir.path())?;

        let report = save_restore_report(&record, &restored, &dir.path().join("packed.png"))?;
        assert_eq!(report, dir.path().join("packed_restored.txt"));
        let contents = fs::read_to_string(report)?;
        assert!(contents.starts_with("name: a.bin\nextension: .bin\nsize: 3\n"));
        assert!(contents.contains(&restored.display().to_string()));
        Ok(())
    }

    #[test]
    fn test_load_image() -> CodecResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("blank.png");
        RgbImage::from_pixel(10, 10, Rgb([255, 255, 255])).save(&path)?;
        assert!(load_image(&path, false).is_ok());
        let missing = load_image(&dir.path().join("missing.png"), false);
        assert!(matches!(missing, Err(CodecError::Io(_) | CodecError::Image(_))));
        Ok(())
    }
}
