use crate::all::*;

pub fn format_log(
  buf: &mut env_logger::fmt::Formatter,
  record: &log::Record,
) -> std::io::Result<()> {
  use std::io::Write;
  let mut style = buf.style();
  use env_logger::fmt::Color::*;
  use log::Level::*;
  style.set_color(match record.level() {
    Error => Red,
    Warn => Rgb(200, 200, 200),
    Info => Green,
    Debug => Magenta,
    Trace => Blue,
  });

  let s = format!("{:30}{}",
    format!("{}:{}",
      record.file().unwrap_or("?"),
      record.line().unwrap_or(0),
    ),
    record.args()
  );
  writeln!(buf, "{}", style.value(s))
}

// Recursively collect the files under `dir`, returned as sorted
// slash-separated names relative to it.
pub fn discover_image_names(dir: &Path) -> Result<Vec<String>> {
  let mut names = vec![];
  collect_file_names(dir, dir, &mut names)?;
  names.sort();
  Ok(names)
}

fn collect_file_names(root: &Path, dir: &Path, names: &mut Vec<String>) -> Result<()> {
  let entries = fs::read_dir(dir)
    .context(format!("Failed to list directory {}.", dir.display()))?;
  for entry in entries {
    let path = entry?.path();
    if path.is_dir() {
      collect_file_names(root, &path, names)?;
    }
    else {
      // Geotag sidecars describe the image next to them and are not inputs.
      if path.extension().map_or(false, |ext| ext == "json") { continue }
      let name = path.strip_prefix(root)?
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
      names.push(name);
    }
  }
  Ok(())
}
