use anyhow::Result;
use clap::ArgMatches;

use super::{output_from_matches, SMALL_FIGSIZE};
use crate::input::RgbaImage;
use crate::render::{save, ImagePreview};

pub fn from_matches(matches: &ArgMatches) -> Result<()> {
    let image = matches.get_one::<RgbaImage>("values").unwrap().clone();
    log::debug!("{}x{} pixels", image.width, image.height);

    let output = output_from_matches(matches, "image", SMALL_FIGSIZE)?;

    save(&ImagePreview { image }, &output)
}
