// NOTE This kind of import-all file isn't a common Rust idiom.

pub use crate::{
  camera::*,
  orchestrator::*,
  pano::*,
  processor::*,
  render_options::*,
  rig::*,
  rotations::*,
  sfm::*,
  spherical::*,
  types::*,
  util::*,
};

pub use {
  std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
  },
  log::{info, warn, LevelFilter},
  anyhow::{anyhow, bail, Context as AnyhowContext, Result},
};
