use crate::all::*;

// Layout of the virtual cameras rendered from each panorama.
#[derive(Debug, Clone)]
pub struct RenderOptions {
  pub num_steps_yaw: usize,
  pub pitches_deg: Vec<f64>,
  pub hfov_deg: f64,
  pub vfov_deg: f64,
}

impl RenderOptions {
  // Named presets selectable on the command line.
  pub fn preset(name: &str) -> Result<RenderOptions> {
    let options = match name {
      "overlapping" => RenderOptions {
        num_steps_yaw: 4,
        pitches_deg: vec![-35., 0., 35.],
        hfov_deg: 90.,
        vfov_deg: 90.,
      },
      // Cubemap without top and bottom images.
      "non-overlapping" => RenderOptions {
        num_steps_yaw: 4,
        pitches_deg: vec![0.],
        hfov_deg: 90.,
        vfov_deg: 90.,
      },
      _ => bail!("Unknown pano render type {}.", name),
    };
    options.validate()?;
    Ok(options)
  }

  pub fn validate(&self) -> Result<()> {
    if self.num_steps_yaw < 1 {
      bail!("At least one yaw step is required.");
    }
    if self.pitches_deg.is_empty() {
      bail!("At least one pitch is required.");
    }
    for fov_deg in [self.hfov_deg, self.vfov_deg] {
      if fov_deg <= 0. || fov_deg >= 180. {
        bail!("Field of view {} degrees is outside (0, 180).", fov_deg);
      }
    }
    Ok(())
  }

  pub fn num_cameras(&self) -> usize {
    self.num_steps_yaw * self.pitches_deg.len()
  }
}
