//! Report and image writers.

use crate::{Error, Result};
use dropsize_core::{Band, Calibration, Circle, GrayImage, ReportRow, REPORT_HEADER};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Report file name inside the output directory.
pub const REPORT_FILE: &str = "out.csv";
/// Settings echo file name inside the output directory.
pub const SETTINGS_FILE: &str = "settings.csv";

const SETTINGS_HEADER: [&str; 4] = [
    "Min Radius (pix)",
    "Max Radius (pix)",
    "Canny Edge Threshold",
    "Accumulator Threshold",
];

const ANNOTATION_COLOUR: Rgb<u8> = Rgb([0, 255, 0]);

/// Floats keep a decimal point (`2.0`, `0.3`).
fn float(value: f64) -> String {
    format!("{value:?}")
}

/// Writer for CSV outputs.
pub struct CsvReportWriter {
    writer: BufWriter<File>,
}

impl CsvReportWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Writes the header and one row per band.
    ///
    /// # Errors
    /// Returns an error on write failure.
    pub fn write_report(&mut self, rows: &[ReportRow]) -> Result<()> {
        writeln!(self.writer, "{}", REPORT_HEADER.join(","))?;

        for row in rows {
            writeln!(
                self.writer,
                "{},{},{},{},{},{}",
                float(row.min_r_mm),
                float(row.max_r_mm),
                float(row.mean_r_micron),
                row.total_count,
                float(row.avg_density),
                float(row.number_density)
            )?;
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Writes the calibration line, the band header, and one row per band.
    ///
    /// # Errors
    /// Returns an error on write failure.
    pub fn write_settings(&mut self, calibration: Calibration, bands: &[Band]) -> Result<()> {
        writeln!(
            self.writer,
            "Calibration (microns/pix),{}",
            float(calibration.microns_per_pixel())
        )?;
        writeln!(self.writer, "{}", SETTINGS_HEADER.join(","))?;
        for band in bands {
            writeln!(
                self.writer,
                "{},{},{},{}",
                band.min_r, band.max_r, band.p1, band.p2
            )?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

/// Colour copy of `image` with `circles` drawn in green, 2 px thick.
#[must_use]
pub fn annotate(image: &GrayImage, circles: &[Circle]) -> RgbImage {
    let mut canvas = DynamicImage::ImageLuma8(image.clone()).to_rgb8();
    for circle in circles {
        for r in [circle.r, circle.r + 1] {
            draw_hollow_circle_mut(&mut canvas, (circle.x, circle.y), r, ANNOTATION_COLOUR);
        }
    }
    canvas
}

/// Path of the annotated copy of `source` inside `output_dir`.
#[must_use]
pub fn annotated_path(output_dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}_out.jpg"))
}

/// Draws `circles` and saves the result as JPEG next to the reports.
///
/// # Errors
/// Returns [`Error::Image`] if encoding or writing fails.
pub fn write_annotated(
    output_dir: &Path,
    source: &Path,
    image: &GrayImage,
    circles: &[Circle],
) -> Result<PathBuf> {
    let path = annotated_path(output_dir, source);
    annotate(image, circles)
        .save(&path)
        .map_err(|source| Error::Image {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{NamedTempFile, TempDir};

    fn row() -> ReportRow {
        ReportRow {
            min_r_mm: 0.3,
            max_r_mm: 0.5,
            mean_r_micron: 400.0,
            total_count: 2,
            avg_density: 2.0,
            number_density: 10.0,
        }
    }

    #[test]
    fn test_write_report() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = CsvReportWriter::create(file.path()).unwrap();
        writer.write_report(&[row()]).unwrap();

        let contents = fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Min r (mm),Max r (mm),Mean r (microns),Total Count (#),Count/Area (#/mm^3),N(r) (#/mm^3)"
        );
        assert_eq!(lines[1], "0.3,0.5,400.0,2,2.0,10.0");
    }

    #[test]
    fn test_write_settings() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = CsvReportWriter::create(file.path()).unwrap();
        let calibration = Calibration::from_microns_per_pixel(5.0).unwrap();
        let bands = [Band::new(30, 50, 100.0, 40.0), Band::new(10, 30, 80.5, 20.0)];
        writer.write_settings(calibration, &bands).unwrap();

        let contents = fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "Calibration (microns/pix),5.0");
        assert_eq!(
            lines[1],
            "Min Radius (pix),Max Radius (pix),Canny Edge Threshold,Accumulator Threshold"
        );
        assert_eq!(lines[2], "30,50,100,40");
        assert_eq!(lines[3], "10,30,80.5,20");
    }

    #[test]
    fn test_annotate_draws_green_ring() {
        let image = GrayImage::from_pixel(40, 40, image::Luma([10]));
        let canvas = annotate(&image, &[Circle::new(20, 20, 10)]);
        assert_eq!(canvas.get_pixel(30, 20), &ANNOTATION_COLOUR);
        assert_eq!(canvas.get_pixel(31, 20), &ANNOTATION_COLOUR);
        assert_eq!(canvas.get_pixel(20, 20), &Rgb([10, 10, 10]));
    }

    #[test]
    fn test_write_annotated_name() {
        let dir = TempDir::new().unwrap();
        let image = GrayImage::new(8, 8);
        let path = write_annotated(dir.path(), Path::new("in/frame_01.png"), &image, &[])
            .unwrap();
        assert_eq!(path, dir.path().join("frame_01_out.jpg"));
        assert!(path.exists());
    }
}
