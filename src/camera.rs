use crate::all::*;

use serde::Serialize;

// Virtual perspective camera used for reprojection, not a physical sensor.
// Simple pinhole: square pixels, principal point at the image center.
#[derive(Debug, Clone, Serialize)]
pub struct VirtualCamera {
  pub width: u32,
  pub height: u32,
  pub focal: f64,
}

impl VirtualCamera {
  // Size the camera so that it covers the given fields of view of the
  // panorama at the panorama's angular resolution.
  pub fn new(
    pano_width: u32,
    pano_height: u32,
    hfov_deg: f64,
    vfov_deg: f64,
  ) -> Result<VirtualCamera> {
    if pano_width == 0 || pano_height == 0 {
      bail!("Panorama dimensions {}x{} are not positive.", pano_width, pano_height);
    }
    if hfov_deg <= 0. || hfov_deg >= 180. || vfov_deg <= 0. || vfov_deg >= 180. {
      bail!("Fields of view {}x{} degrees are outside (0, 180).", hfov_deg, vfov_deg);
    }
    let width = (pano_width as f64 * hfov_deg / 360.).round();
    let height = (pano_height as f64 * vfov_deg / 180.).round();
    if width < 1. || height < 1. {
      bail!("Virtual camera size {}x{} is degenerate.", width, height);
    }
    Ok(VirtualCamera {
      width: width as u32,
      height: height as u32,
      focal: width / (2. * (hfov_deg.to_radians() / 2.).tan()),
    })
  }

  // The center of the upper left most pixel has coordinate (0.5, 0.5).
  pub fn pixel_to_ray(&self, x: f64, y: f64) -> Vector3d {
    let cx = self.width as f64 / 2.;
    let cy = self.height as f64 / 2.;
    Vector3d::new((x - cx) / self.focal, (y - cy) / self.focal, 1.).normalize()
  }

  // One unit ray per pixel in row-major order, index `y * width + x`. The
  // resampler and the mask writer follow the same ordering.
  pub fn rays(&self) -> Vec<Vector3d> {
    let mut rays = Vec::with_capacity((self.width * self.height) as usize);
    for y in 0..self.height {
      for x in 0..self.width {
        rays.push(self.pixel_to_ray(x as f64 + 0.5, y as f64 + 0.5));
      }
    }
    rays
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_virtual_camera() {
    let camera = VirtualCamera::new(4000, 2000, 90., 90.).unwrap();
    assert_eq!(camera.width, 1000);
    assert_eq!(camera.height, 1000);
    // focal = width / (2 tan(45 deg)) = width / 2.
    assert!((camera.focal - 500.).abs() < 1e-9);

    assert!(VirtualCamera::new(0, 2000, 90., 90.).is_err());
    assert!(VirtualCamera::new(4000, 0, 90., 90.).is_err());
    assert!(VirtualCamera::new(4000, 2000, 180., 90.).is_err());
    assert!(VirtualCamera::new(4000, 2000, 90., -10.).is_err());
  }

  #[test]
  fn test_rays() {
    let camera = VirtualCamera::new(400, 200, 90., 90.).unwrap();
    let rays = camera.rays();
    assert_eq!(rays.len(), (camera.width * camera.height) as usize);
    for ray in &rays {
      assert!((ray.norm() - 1.).abs() < 1e-9);
    }
    // The upper left ray points up and to the left of the optical axis.
    assert!(rays[0][0] < 0. && rays[0][1] < 0. && rays[0][2] > 0.);
    // A pixel one focal length right of the center maps to a 45 degree ray.
    let ray = camera.pixel_to_ray(camera.width as f64 / 2. + camera.focal, camera.height as f64 / 2.);
    assert!((ray - Vector3d::new(1., 0., 1.).normalize()).norm() < 1e-9);
  }
}
