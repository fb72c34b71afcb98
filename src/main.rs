mod all;
mod camera;
mod orchestrator;
mod pano;
mod processor;
mod render_options;
mod rig;
mod rotations;
mod sfm;
mod spherical;
mod types;
mod util;

use all::*;

use clap::Parser;

// Converts 360 degree spherical panoramas into perspective images, per-pixel
// ownership masks and a rig config for structure-from-motion.
#[derive(Parser)]
struct Args {
  // Directory with the equirectangular input panoramas.
  #[clap(long)]
  input_image_path: String,
  // Directory for the rendered images, masks and the rig config.
  #[clap(long)]
  output_path: String,
  #[clap(long, default_value = "sequential")]
  matcher: String,
  #[clap(long, default_value = "overlapping")]
  pano_render_type: String,
}

fn handle_error(err: &anyhow::Error) {
  for (i, e) in err.chain().enumerate() {
    println!("  {}: {}", i + 1, e);
  }
}

fn main() {
  if let Err(err) = run() {
    handle_error(&err);
    std::process::exit(1);
  }
}

fn run() -> Result<()> {
  let args = Args::parse();

  env_logger::Builder::new()
    .filter_level(LevelFilter::Info)
    .format(util::format_log)
    .init();

  // Fail on configuration typos before any rendering starts.
  let matcher = Matcher::parse(&args.matcher)?;
  let render_options = RenderOptions::preset(&args.pano_render_type)?;

  let output_path = Path::new(&args.output_path);
  let image_dir = output_path.join("images");
  let mask_dir = output_path.join("masks");
  fs::create_dir_all(&image_dir)
    .context(format!("Failed to create {}.", image_dir.display()))?;
  fs::create_dir_all(&mask_dir)
    .context(format!("Failed to create {}.", mask_dir.display()))?;

  let pano_image_dir = Path::new(&args.input_image_path);
  let pano_image_names = discover_image_names(pano_image_dir)?;
  info!("Found {} images in {}.", pano_image_names.len(), pano_image_dir.display());

  let rig_config = render_perspective_images(
    &pano_image_names,
    pano_image_dir,
    &image_dir,
    &mask_dir,
    render_options,
  )?;

  let rig_config_path = output_path.join("rig_config.json");
  write_rig_config(&rig_config_path, &rig_config)?;
  info!(
    "Wrote rig config with {} cameras to {}.",
    rig_config.cameras.len(),
    rig_config_path.display(),
  );
  info!(
    "Ready for reconstruction with the {} matcher on {}.",
    matcher.name(),
    image_dir.display(),
  );
  Ok(())
}
