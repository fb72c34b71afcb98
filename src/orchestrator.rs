use crate::all::*;

use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

// Renders all panoramas through a bounded worker pool. Panoramas are
// independent of each other apart from the lazily initialized session state
// of the processor, so no ordering is required.
pub fn render_perspective_images(
  pano_image_names: &[String],
  pano_image_dir: &Path,
  output_image_dir: &Path,
  mask_dir: &Path,
  render_options: RenderOptions,
) -> Result<RigConfig> {
  info!(
    "Rendering {} virtual cameras for each of {} panoramas.",
    render_options.num_cameras(),
    pano_image_names.len(),
  );
  let processor = PanoProcessor::new(
    pano_image_dir,
    output_image_dir,
    mask_dir,
    render_options,
  )?;

  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(max_workers())
    .build()
    .context("Failed to build the worker pool.")?;

  let total = pano_image_names.len();
  let num_done = AtomicUsize::new(0);
  let results: Vec<Result<()>> = pool.install(|| {
    pano_image_names.par_iter()
      .map(|pano_name| {
        let result = processor.process(pano_name)
          .context(format!("Failed to process panorama {}.", pano_name));
        let done = num_done.fetch_add(1, Ordering::Relaxed) + 1;
        info!("Finished panorama {}/{}: {}", done, total, pano_name);
        result
      })
      .collect()
  });
  // All tasks have been accounted for, re-raise the first failure. Outputs
  // written by completed tasks stay on disk.
  for result in results {
    result?;
  }
  Ok(processor.into_rig_config())
}

fn max_workers() -> usize {
  let cpus = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(2);
  cpus.saturating_sub(1).clamp(1, 32)
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};

  #[test]
  fn test_render_perspective_images() {
    let dir = tempfile::tempdir().unwrap();
    let pano_dir = dir.path().join("panos");
    let image_dir = dir.path().join("images");
    let mask_dir = dir.path().join("masks");
    fs::create_dir_all(&pano_dir).unwrap();
    for name in ["a.png", "b.png"] {
      let image = RgbImage::from_fn(128, 64, |x, y| {
        Rgb([(2 * x % 256) as u8, (4 * y % 256) as u8, 0])
      });
      image.save(pano_dir.join(name)).unwrap();
    }

    let options = RenderOptions {
      num_steps_yaw: 4,
      pitches_deg: vec![0.],
      hfov_deg: 90.,
      vfov_deg: 90.,
    };
    let names = vec!["a.png".to_string(), "b.png".to_string()];
    let rig_config =
      render_perspective_images(&names, &pano_dir, &image_dir, &mask_dir, options).unwrap();

    assert_eq!(rig_config.cameras.len(), 4);
    assert_eq!(rig_config.cameras.iter().filter(|c| c.ref_sensor).count(), 1);
    for rig_camera in &rig_config.cameras {
      // Intrinsics were attached from the first decoded panorama.
      let camera = rig_camera.camera.as_ref().unwrap();
      assert_eq!((camera.width, camera.height), (32, 32));
      for name in ["a.png", "b.png"] {
        assert!(image_dir.join(format!("{}{}", rig_camera.image_prefix, name)).exists());
        assert!(mask_dir.join(format!("{}{}.png", rig_camera.image_prefix, name)).exists());
      }
    }
  }

  #[test]
  fn test_failure_is_reported_after_drain() {
    let dir = tempfile::tempdir().unwrap();
    let pano_dir = dir.path().join("panos");
    fs::create_dir_all(&pano_dir).unwrap();
    // Valid first, non-equirectangular second.
    RgbImage::from_pixel(64, 32, Rgb([1, 2, 3]))
      .save(pano_dir.join("a.png")).unwrap();
    RgbImage::from_pixel(64, 48, Rgb([1, 2, 3]))
      .save(pano_dir.join("b.png")).unwrap();

    let options = RenderOptions {
      num_steps_yaw: 2,
      pitches_deg: vec![0.],
      hfov_deg: 90.,
      vfov_deg: 90.,
    };
    let names = vec!["a.png".to_string(), "b.png".to_string()];
    let result = render_perspective_images(
      &names,
      &pano_dir,
      &dir.path().join("images"),
      &dir.path().join("masks"),
      options,
    );
    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("b.png"));
  }
}
