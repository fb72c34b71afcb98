use crate::all::*;

use image::{GrayImage, Luma, RgbImage};
use once_cell::sync::OnceCell;

// Shared state derived from the first successfully decoded panorama and
// frozen for the rest of the run. All panoramas of a batch are expected to
// share the same dimensions, so the ray table is computed only once.
struct Session {
  camera: VirtualCamera,
  pano_size: (u32, u32),
  rays_in_cam: Vec<Vector3d>,
}

// Renders one panorama into every virtual camera and computes the ownership
// masks. Thread safe: `process` may be called concurrently for different
// panoramas.
pub struct PanoProcessor {
  pano_image_dir: PathBuf,
  output_image_dir: PathBuf,
  mask_dir: PathBuf,
  render_options: RenderOptions,
  cams_from_pano: Vec<Matrix3d>,
  // Optical axis of each camera in the panorama frame, used to assign every
  // pixel to its angularly closest camera.
  cam_centers_in_pano: Vec<Vector3d>,
  rig_config: Mutex<RigConfig>,
  session: OnceCell<Session>,
}

impl PanoProcessor {
  pub fn new(
    pano_image_dir: &Path,
    output_image_dir: &Path,
    mask_dir: &Path,
    render_options: RenderOptions,
  ) -> Result<PanoProcessor> {
    render_options.validate()?;
    let cams_from_pano = virtual_rotations(
      render_options.num_steps_yaw,
      &render_options.pitches_deg,
    );
    let cam_centers_in_pano = camera_centers_in_pano(&cams_from_pano);
    let rig_config = Mutex::new(RigConfig::new(&cams_from_pano, 0));
    Ok(PanoProcessor {
      pano_image_dir: pano_image_dir.to_path_buf(),
      output_image_dir: output_image_dir.to_path_buf(),
      mask_dir: mask_dir.to_path_buf(),
      render_options,
      cams_from_pano,
      cam_centers_in_pano,
      rig_config,
      session: OnceCell::new(),
    })
  }

  pub fn process(&self, pano_name: &str) -> Result<()> {
    let pano_path = self.pano_image_dir.join(pano_name);
    let pano = match PanoImage::load(&pano_path) {
      Ok(pano) => pano,
      Err(err) => {
        info!("Skipping file {} as it cannot be read: {:#}", pano_path.display(), err);
        return Ok(());
      },
    };

    let (pano_width, pano_height) = pano.image.dimensions();
    check_pano_size(pano_width, pano_height)?;

    // First image initializes the shared state, later images only read it.
    let session = self.session
      .get_or_try_init(|| self.init_session(pano_width, pano_height))?;
    if (pano_width, pano_height) != session.pano_size {
      bail!(
        "Panoramas of different sizes are not supported: {} is {}x{}, expected {}x{}.",
        pano_name, pano_width, pano_height, session.pano_size.0, session.pano_size.1,
      );
    }

    for cam_idx in 0..self.cams_from_pano.len() {
      self.render_view(&pano, pano_name, session, cam_idx)?;
    }
    Ok(())
  }

  pub fn into_rig_config(self) -> RigConfig {
    self.rig_config.into_inner().unwrap()
  }

  // Builds the virtual camera, precomputes the per-pixel rays and attaches
  // the now known intrinsics to every rig entry.
  fn init_session(&self, pano_width: u32, pano_height: u32) -> Result<Session> {
    let camera = VirtualCamera::new(
      pano_width,
      pano_height,
      self.render_options.hfov_deg,
      self.render_options.vfov_deg,
    )?;
    let rays_in_cam = camera.rays();
    self.rig_config.lock().unwrap().attach_camera(&camera);
    Ok(Session {
      camera,
      pano_size: (pano_width, pano_height),
      rays_in_cam,
    })
  }

  fn render_view(
    &self,
    pano: &PanoImage,
    pano_name: &str,
    session: &Session,
    cam_idx: usize,
  ) -> Result<()> {
    let width = session.camera.width;
    let height = session.camera.height;
    let (pano_width, pano_height) = session.pano_size;
    let pano_from_cam = self.cams_from_pano[cam_idx].transpose();

    let mut view = RgbImage::new(width, height);
    let mut mask = GrayImage::new(width, height);
    for y in 0..height {
      for x in 0..width {
        let ray_in_pano = pano_from_cam * session.rays_in_cam[(y * width + x) as usize];
        let uv = spherical_from_ray(pano_width, pano_height, &ray_in_pano);
        // Spherical coordinates have pixel centers at (x + 0.5, y + 0.5),
        // the sampler has them at integer coordinates.
        view.put_pixel(x, y, sample_bilinear_wrap(&pano.image, uv[0] - 0.5, uv[1] - 0.5));
        // Each panorama pixel has its features extracted in only a single
        // virtual camera.
        if closest_camera(&self.cam_centers_in_pano, &ray_in_pano) == cam_idx {
          mask.put_pixel(x, y, Luma([255]));
        }
      }
    }

    let image_name = {
      let rig_config = self.rig_config.lock().unwrap();
      format!("{}{}", rig_config.cameras[cam_idx].image_prefix, pano_name)
    };
    let image_path = self.output_image_dir.join(&image_name);
    write_output(&image_path, |path| view.save(path))?;
    if let Some(geotag) = &pano.geotag {
      geotag.write(&image_path)?;
    }
    let mask_path = self.mask_dir.join(format!("{}.png", image_name));
    write_output(&mask_path, |path| mask.save(path))?;
    Ok(())
  }
}

// Index of the camera whose viewing direction is angularly closest to the
// ray. Ties go to the lowest index, making the assignment a partition of
// the sphere.
pub fn closest_camera(cam_centers_in_pano: &[Vector3d], ray_in_pano: &Vector3d) -> usize {
  let mut best_idx = 0;
  let mut best_dot = f64::NEG_INFINITY;
  for (idx, center) in cam_centers_in_pano.iter().enumerate() {
    let dot = ray_in_pano.dot(center);
    if dot > best_dot {
      best_idx = idx;
      best_dot = dot;
    }
  }
  best_idx
}

fn write_output(
  path: &Path,
  save: impl Fn(&Path) -> std::result::Result<(), image::ImageError>,
) -> Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)
      .context(format!("Failed to create directory {}.", parent.display()))?;
  }
  save(path).context(format!("Failed to write {}.", path.display()))?;
  Ok(())
}
