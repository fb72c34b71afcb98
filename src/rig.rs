use crate::all::*;

use nalgebra::{Quaternion, Rotation3, UnitQuaternion};
use serde::Serialize;

// Rigid transform whose rotation is stored as a wxyz unit quaternion, the
// representation used in the rig config handoff file.
#[derive(Debug, Clone, Serialize)]
pub struct Rigid3d {
  pub rotation_wxyz: [f64; 4],
  pub translation: [f64; 3],
}

impl Rigid3d {
  // All virtual cameras share the panorama's optical center, so the
  // translation is always zero.
  pub fn from_rotation(rotation: &Matrix3d) -> Rigid3d {
    let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*rotation));
    Rigid3d {
      rotation_wxyz: [q.w, q.i, q.j, q.k],
      translation: [0., 0., 0.],
    }
  }

  #[allow(dead_code)]
  pub fn rotation_matrix(&self) -> Matrix3d {
    let [w, x, y, z] = self.rotation_wxyz;
    UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
      .to_rotation_matrix()
      .into_inner()
  }
}

// One virtual camera's role in the rig. The image prefix namespaces the
// rendered files of this camera and is stable across runs.
#[derive(Debug, Clone, Serialize)]
pub struct RigCamera {
  pub ref_sensor: bool,
  pub image_prefix: String,
  pub cam_from_rig: Option<Rigid3d>,
  pub camera: Option<VirtualCamera>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RigConfig {
  pub cameras: Vec<RigCamera>,
}

impl RigConfig {
  // One entry per virtual rotation. The reference camera carries no
  // transform, every other camera is expressed relative to it.
  pub fn new(cams_from_pano: &[Matrix3d], ref_idx: usize) -> RigConfig {
    let mut cameras = vec![];
    for (idx, cam_from_pano) in cams_from_pano.iter().enumerate() {
      let cam_from_rig = if idx == ref_idx {
        None
      }
      else {
        let cam_from_ref = cam_from_pano * cams_from_pano[ref_idx].transpose();
        Some(Rigid3d::from_rotation(&cam_from_ref))
      };
      cameras.push(RigCamera {
        ref_sensor: idx == ref_idx,
        image_prefix: format!("pano_camera{}/", idx),
        cam_from_rig,
        camera: None,
      });
    }
    RigConfig { cameras }
  }

  // Called exactly once, after the intrinsics become known from the first
  // decoded panorama.
  pub fn attach_camera(&mut self, camera: &VirtualCamera) {
    for rig_camera in &mut self.cameras {
      rig_camera.camera = Some(camera.clone());
    }
  }
}
