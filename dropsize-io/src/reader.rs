//! Image directory source.

use crate::{Error, Result};
use dropsize_core::GrayImage;
use image::ImageFormat;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Image files of one directory, ordered by file name.
///
/// Files whose extension is not a known image format are ignored, so reports
/// and settings written into the same directory are not picked up.
#[derive(Debug, Clone)]
pub struct ImageDirectory {
    dir: PathBuf,
    paths: Vec<PathBuf>,
}

impl ImageDirectory {
    /// Lists `dir`.
    ///
    /// # Errors
    /// Returns [`Error::InputDir`] if the directory cannot be read.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let entries = fs::read_dir(&dir).map_err(|source| Error::InputDir {
            path: dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::InputDir {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if ImageFormat::from_path(&path).is_err() {
                debug!("ignoring non-image file {}", path.display());
                continue;
            }
            paths.push(path);
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(Self { dir, paths })
    }

    /// Listed directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Image paths in processing order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of image files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true if the directory holds no image files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Decodes every image lazily, in order.
    pub fn images(&self) -> impl Iterator<Item = (&Path, Result<GrayImage>)> + '_ {
        self.paths
            .iter()
            .map(|path| (path.as_path(), load_gray(path)))
    }
}

/// Decodes an image file to 8-bit grayscale.
///
/// # Errors
/// Returns [`Error::Image`] if decoding fails, or [`Error::EmptyImage`] for a
/// zero-sized image.
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
    let path = path.as_ref();
    let gray = image::open(path)
        .map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_luma8();
    if gray.width() == 0 || gray.height() == 0 {
        return Err(Error::EmptyImage(path.to_path_buf()));
    }
    Ok(gray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};
    use tempfile::TempDir;

    #[test]
    fn test_listing_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["b.png", "a.png", "c.bmp"] {
            image::GrayImage::new(4, 3).save(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("out.csv"), "x").unwrap();
        fs::create_dir(dir.path().join("sub.png")).unwrap();

        let images = ImageDirectory::open(dir.path()).unwrap();
        let names: Vec<_> = images
            .paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.bmp"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = ImageDirectory::open(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::InputDir { .. }));
    }

    #[test]
    fn test_colour_image_decoded_to_gray() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rgb.png");
        let mut rgb = image::RgbImage::new(5, 2);
        rgb.put_pixel(1, 1, Rgb([255, 255, 255]));
        rgb.save(&path).unwrap();

        let gray = load_gray(&path).unwrap();
        assert_eq!((gray.width(), gray.height()), (5, 2));
        assert_eq!(gray.get_pixel(1, 1)[0], 255);
        assert_eq!(gray.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_corrupt_image_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"not a png").unwrap();
        assert!(matches!(load_gray(&path), Err(Error::Image { .. })));

        let mut ok = image::GrayImage::new(2, 2);
        ok.put_pixel(0, 0, Luma([7]));
        ok.save(dir.path().join("ok.png")).unwrap();
        let listing = ImageDirectory::open(dir.path()).unwrap();
        let results: Vec<bool> = listing.images().map(|(_, r)| r.is_ok()).collect();
        assert_eq!(results, vec![false, true]);
    }
}
