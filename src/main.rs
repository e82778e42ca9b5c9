#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

mod app;
mod cli;
mod export;

use clap::Parser;
use crop_engine::CropperConfig;
use eframe::egui;
use log::{debug, info};

use crate::app::ImageCropper;
use crate::cli::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Console logging with specified verbosity level (respects RUST_LOG if set)
    let default_level = match args.verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .filter_module("egui", log::LevelFilter::Info)
        .filter_module("eframe", log::LevelFilter::Info)
        .format_timestamp_millis()
        .init();
    debug!("Command-line args: {:?}", args);

    let config = CropperConfig::load_or_default(args.config.as_deref())?;

    if let (Some(input), Some(output)) = (&args.file, &args.output) {
        return export::export(input, output, args.rotate);
    }

    let rotation = args.rotate.to_radians();

    info!("Image cropper starting");
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Image Cropper",
        options,
        Box::new(move |cc| Ok(Box::new(ImageCropper::new(cc, config, args.file, rotation)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
