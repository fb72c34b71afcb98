use crate::all::*;

// Handoff to the downstream structure-from-motion tool: it consumes the
// rendered images grouped by camera prefix, the mask directory and the rig
// config written here, and constrains the virtual camera poses with the
// relative rig transforms.

// Pairwise matching strategy of the downstream tool. Validated here so that
// a typo aborts the run before hours of rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
  Sequential,
  Exhaustive,
  VocabTree,
  Spatial,
}

impl Matcher {
  pub fn parse(name: &str) -> Result<Matcher> {
    match name {
      "sequential" => Ok(Matcher::Sequential),
      "exhaustive" => Ok(Matcher::Exhaustive),
      "vocabtree" => Ok(Matcher::VocabTree),
      "spatial" => Ok(Matcher::Spatial),
      _ => bail!("Unknown matcher {}.", name),
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      Matcher::Sequential => "sequential",
      Matcher::Exhaustive => "exhaustive",
      Matcher::VocabTree => "vocabtree",
      Matcher::Spatial => "spatial",
    }
  }
}

pub fn write_rig_config(path: &Path, rig_config: &RigConfig) -> Result<()> {
  let s = serde_json::to_string_pretty(rig_config)?;
  fs::write(path, s).context(format!("Failed to write {}.", path.display()))?;
  Ok(())
}
