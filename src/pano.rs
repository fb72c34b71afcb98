use crate::all::*;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

// A decoded equirectangular panorama together with its optional geolocation.
pub struct PanoImage {
  pub image: RgbImage,
  pub geotag: Option<GeoTag>,
}

impl PanoImage {
  pub fn load(path: &Path) -> Result<PanoImage> {
    let image = image::open(path)
      .context(format!("Failed to decode {}.", path.display()))?
      .to_rgb8();
    Ok(PanoImage {
      image,
      geotag: GeoTag::load(path),
    })
  }
}

// Geolocation carried in a `<image>.json` sidecar next to the panorama.
// Only these fields are read, anything else in the sidecar is discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoTag {
  pub latitude: f64,
  pub longitude: f64,
  pub altitude: Option<f64>,
}

impl GeoTag {
  pub fn sidecar_path(image_path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.json", image_path.display()))
  }

  // Metadata never blocks rendering: unreadable or malformed sidecars are
  // logged and dropped.
  pub fn load(image_path: &Path) -> Option<GeoTag> {
    let path = GeoTag::sidecar_path(image_path);
    if !path.exists() { return None }
    let s = match fs::read_to_string(&path) {
      Ok(s) => s,
      Err(err) => {
        warn!("Failed to read geotag {}: {}", path.display(), err);
        return None;
      },
    };
    match serde_json::from_str(&s) {
      Ok(geotag) => Some(geotag),
      Err(err) => {
        warn!("Ignoring malformed geotag {}: {}", path.display(), err);
        None
      },
    }
  }

  pub fn write(&self, image_path: &Path) -> Result<()> {
    let path = GeoTag::sidecar_path(image_path);
    let s = serde_json::to_string_pretty(self)?;
    fs::write(&path, s).context(format!("Failed to write {}.", path.display()))?;
    Ok(())
  }
}

// Bilinear interpolation in the OpenCV pixel convention where integer
// coordinates are pixel centers. The longitude seam wraps around, the poles
// clamp.
pub fn sample_bilinear_wrap(image: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
  let width = image.width() as i64;
  let height = image.height() as i64;
  let x0 = x.floor();
  let y0 = y.floor();
  let xa = x - x0;
  let ya = y - y0;
  let x0 = x0 as i64;
  let y0 = y0 as i64;

  let mut rgb = [0.; 3];
  for (dy, wy) in [(0, 1. - ya), (1, ya)] {
    let yi = (y0 + dy).clamp(0, height - 1) as u32;
    for (dx, wx) in [(0, 1. - xa), (1, xa)] {
      let xi = (x0 + dx).rem_euclid(width) as u32;
      let pixel = image.get_pixel(xi, yi);
      for c in 0..3 {
        rgb[c] += wx * wy * pixel[c] as f64;
      }
    }
  }
  Rgb([
    rgb[0].round() as u8,
    rgb[1].round() as u8,
    rgb[2].round() as u8,
  ])
}
