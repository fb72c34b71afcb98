use crate::all::*;

use nalgebra::Rotation3;

// Relative rotations of the virtual cameras w.r.t. the panorama, assuming
// the panoramas are approximately upright. The order is pitch-major,
// yaw-minor with ascending yaw; downstream code binds images to cameras by
// this index order.
pub fn virtual_rotations(num_steps_yaw: usize, pitches_deg: &[f64]) -> Vec<Matrix3d> {
  let yaw_step_deg = 360. / num_steps_yaw as f64;
  let mut cams_from_pano = vec![];
  for &pitch_deg in pitches_deg {
    // Stagger the upward rings half a step against the horizon ring so that
    // the coverage gaps do not line up.
    let yaw_offset_deg = if pitch_deg > 0. { yaw_step_deg / 2. } else { 0. };
    for step in 0..num_steps_yaw {
      let yaw_deg = step as f64 * yaw_step_deg + yaw_offset_deg;
      cams_from_pano.push(cam_from_pano_rotation(pitch_deg, yaw_deg));
    }
  }
  cams_from_pano
}

// Intrinsic XY Euler rotation with negated angles: the camera turns into
// the scene rather than the scene turning toward the camera.
fn cam_from_pano_rotation(pitch_deg: f64, yaw_deg: f64) -> Matrix3d {
  let rx = Rotation3::from_axis_angle(&Vector3d::x_axis(), -pitch_deg.to_radians());
  let ry = Rotation3::from_axis_angle(&Vector3d::y_axis(), -yaw_deg.to_radians());
  (rx * ry).into_inner()
}

// Optical axis of each camera expressed in the panorama frame.
pub fn camera_centers_in_pano(cams_from_pano: &[Matrix3d]) -> Vec<Vector3d> {
  cams_from_pano.iter()
    .map(|cam_from_pano| cam_from_pano.transpose() * Vector3d::new(0., 0., 1.))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn axis_yaw_pitch_deg(cam_from_pano: &Matrix3d) -> (f64, f64) {
    let axis = cam_from_pano.transpose() * Vector3d::new(0., 0., 1.);
    let yaw = axis[0].atan2(axis[2]).to_degrees().rem_euclid(360.);
    let pitch = -axis[1].atan2(axis[0].hypot(axis[2])).to_degrees();
    (yaw, pitch)
  }

  #[test]
  fn test_horizon_ring() {
    let rotations = virtual_rotations(4, &[0.]);
    assert_eq!(rotations.len(), 4);
    for (idx, rotation) in rotations.iter().enumerate() {
      // Orthonormal.
      assert!((rotation * rotation.transpose() - Matrix3d::identity()).norm() < 1e-9);
      let (yaw, pitch) = axis_yaw_pitch_deg(rotation);
      assert!((yaw - 90. * idx as f64).abs() < 1e-9);
      assert!(pitch.abs() < 1e-9);
    }
  }

  #[test]
  fn test_pitched_rings() {
    // Pitch-major order with a half step yaw offset for the upward ring only.
    let rotations = virtual_rotations(4, &[-35., 0., 35.]);
    assert_eq!(rotations.len(), 12);
    for idx in 0..4 {
      let (yaw, pitch) = axis_yaw_pitch_deg(&rotations[idx]);
      assert!((yaw - 90. * idx as f64).abs() < 1e-9);
      assert!((pitch + 35.).abs() < 1e-9);
      let (yaw, pitch) = axis_yaw_pitch_deg(&rotations[4 + idx]);
      assert!((yaw - 90. * idx as f64).abs() < 1e-9);
      assert!(pitch.abs() < 1e-9);
      let (yaw, pitch) = axis_yaw_pitch_deg(&rotations[8 + idx]);
      assert!((yaw - (45. + 90. * idx as f64)).abs() < 1e-9);
      assert!((pitch - 35.).abs() < 1e-9);
    }
  }
}
