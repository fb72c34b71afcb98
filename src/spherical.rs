use crate::all::*;

use std::f64::consts::PI;

// Standard equirectangular mapping: the horizontal pixel position is the
// longitude over [0, 360) and the vertical position the latitude over
// [-90, 90], y up. Wrapping at the longitude seam is the resampler's
// responsibility.

pub fn check_pano_size(width: u32, height: u32) -> Result<()> {
  if width != height * 2 || height == 0 {
    bail!("Only 360 degree panoramas are supported, got {}x{}.", width, height);
  }
  Ok(())
}

pub fn spherical_from_ray(pano_width: u32, pano_height: u32, ray: &Vector3d) -> Vector2d {
  let yaw = ray[0].atan2(ray[2]);
  let pitch = -ray[1].atan2(ray[0].hypot(ray[2]));
  Vector2d::new(
    (1. + yaw / PI) / 2. * pano_width as f64,
    (1. - pitch * 2. / PI) / 2. * pano_height as f64,
  )
}
