#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use blackout::pipeline::PipelineConfig;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Writes a solid single-color PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32, color: Rgb<u8>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    // The watcher dispatches on the create event and never retries, so
    // the content must be complete the instant the name appears. Stage
    // the bytes under an extension the watcher ignores, then hard-link
    // to the final name: link(2) fires the create event atomically with
    // the full content in place.
    let mut bytes = Vec::new();
    RgbImage::from_pixel(width, height, color)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    let staging = path.with_extension("staging");
    fs::write(&staging, bytes).expect("write png file");
    fs::hard_link(&staging, path).expect("link png into place");
    fs::remove_file(&staging).expect("remove staging file");
}

/// Loads an image back as an RGB buffer for pixel assertions.
pub fn read_rgb(path: &Path) -> RgbImage {
    image::open(path).expect("open image").into_rgb8()
}

/// Creates `images/`, `labels/` and `out/` under `root` and returns the
/// pipeline configuration pointing at them.
pub fn setup_dirs(root: &Path) -> PipelineConfig {
    let config = PipelineConfig {
        images_dir: root.join("images"),
        labels_dir: root.join("labels"),
        output_dir: root.join("out"),
    };
    for dir in [&config.images_dir, &config.labels_dir, &config.output_dir] {
        fs::create_dir_all(dir).expect("create pipeline dir");
    }
    config
}

/// Writes a label file for the given image stem.
pub fn write_labels(config: &PipelineConfig, stem: &str, content: &str) -> PathBuf {
    let path = config.labels_dir.join(format!("{stem}.txt"));
    fs::write(&path, content).expect("write label file");
    path
}
