// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! bbox-annotator - headless batch annotation
//!
//! Runs a batch over an image directory, replaying recorded editor event
//! scripts in place of an interactive canvas.

use anyhow::{bail, Result};
use bbox_annotator::config::{AnnotatorConfig, CONFIG_FILE_NAME};
use bbox_annotator::io::serialization::{find_script, load_event_script};
use bbox_annotator::ui::replay::ReplayHost;
use bbox_annotator::{Annotator, ExistingLabelPolicy, FixedPolicy, ResumePolicy};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "bbox-annotator",
    version,
    about = "Annotate an image directory with bounding boxes, replaying recorded editor event scripts"
)]
struct CliArgs {
    /// Config file to load (and to write with --init-config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration and exit unless directories are given
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,

    /// Where to resume a batch with a progress record: continue|restart|review
    #[arg(long, default_value = "continue")]
    resume: ResumePolicy,

    /// What to do with images that already have labels: skip|edit|overwrite
    #[arg(long, default_value = "edit")]
    existing: ExistingLabelPolicy,

    /// Directory holding `<image stem>.yaml|yml|json` event scripts
    #[arg(long)]
    script_dir: Option<PathBuf>,

    /// Directory of images to annotate
    #[arg(required_unless_present = "init_config")]
    image_dir: Option<PathBuf>,

    /// Directory the label files are written to
    #[arg(required_unless_present = "init_config")]
    output_dir: Option<PathBuf>,
}

/// Host for one image: its recorded script, or no events at all.
fn host_for(script_dir: Option<&Path>, image: &Path) -> ReplayHost {
    let Some(script) = script_dir.and_then(|dir| find_script(dir, image)) else {
        log::info!("No event script for {}", image.display());
        return ReplayHost::default();
    };
    match load_event_script(&script) {
        Ok(events) => ReplayHost::new(events),
        Err(e) => {
            log::error!("{:#}", e);
            ReplayHost::default()
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = CliArgs::parse();
    let config = AnnotatorConfig::discover(args.config.as_deref());

    if args.init_config {
        let path = args.config.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        config.save_to_file(&path)?;
        println!("Config written to {}", path.display());
        if args.output_dir.is_none() {
            return Ok(());
        }
    }

    let (Some(image_dir), Some(output_dir)) = (args.image_dir.as_deref(), args.output_dir.as_deref()) else {
        bail!("Both IMAGE_DIR and OUTPUT_DIR are required");
    };

    let annotator = Annotator::new(config);
    let mut policy = FixedPolicy::new(args.resume, args.existing);
    let script_dir = args.script_dir.as_deref();
    let summary = annotator.run_batch(image_dir, output_dir, &mut policy, |image| host_for(script_dir, image))?;

    println!("{}", "=".repeat(50));
    println!("ANNOTATION SUMMARY:");
    println!("Total images: {}", summary.total_images);
    println!("Annotated images: {}", summary.total_annotated);
    println!("Annotated this session: {}", summary.annotated_this_session);
    println!("Remaining images: {}", summary.remaining());
    if summary.cancelled {
        println!("Stopped by user.");
    }
    println!("{}", "=".repeat(50));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("bbox-annotator").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_full_command_line() {
        let args = parse(&[
            "--resume",
            "review",
            "--existing",
            "skip",
            "--script-dir",
            "scripts",
            "images",
            "labels",
        ])
        .unwrap();
        assert_eq!(args.resume, ResumePolicy::Review);
        assert_eq!(args.existing, ExistingLabelPolicy::Skip);
        assert_eq!(args.script_dir, Some(PathBuf::from("scripts")));
        assert_eq!(args.image_dir, Some(PathBuf::from("images")));
        assert_eq!(args.output_dir, Some(PathBuf::from("labels")));
        assert!(!args.init_config);
    }

    #[test]
    fn test_parse_defaults() {
        let args = parse(&["images", "labels"]).unwrap();
        assert_eq!(args.resume, ResumePolicy::Continue);
        assert_eq!(args.existing, ExistingLabelPolicy::Edit);
        assert_eq!(args.config, None);
        assert_eq!(args.script_dir, None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["images"]).is_err());
        assert!(parse(&["--resume"]).is_err());
        assert!(parse(&["--resume", "later", "a", "b"]).is_err());
        assert!(parse(&["--verbose", "a", "b"]).is_err());
        assert!(parse(&["a", "b", "c"]).is_err());
    }

    #[test]
    fn test_init_config_needs_no_directories() {
        let args = parse(&["--init-config", "--config", "custom.yaml"]).unwrap();
        assert!(args.init_config);
        assert_eq!(args.config, Some(PathBuf::from("custom.yaml")));
        assert_eq!(args.output_dir, None);
    }

    #[test]
    fn test_missing_script_gives_empty_host() {
        let host = host_for(None, Path::new("img.png"));
        assert_eq!(host.remaining(), 0);
    }
}
