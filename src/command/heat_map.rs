use anyhow::Result;
use clap::ArgMatches;

use super::{output_from_matches, SMALL_FIGSIZE};
use crate::colormap::ColorMap;
use crate::grid::{Grid, MissingPolicy};
use crate::input::Tick;
use crate::render::{save, ColorBar, HeatMap, HeatMapOptionsBuilder, Orientation};

fn ticks(matches: &ArgMatches, id: &str) -> Vec<Tick> {
    matches
        .get_many::<Tick>(id)
        .map(|ticks| ticks.cloned().collect())
        .unwrap_or_default()
}

pub fn from_matches(matches: &ArgMatches) -> Result<()> {
    let width = *matches.get_one::<usize>("width").unwrap();
    let height = *matches.get_one::<usize>("height").unwrap();
    let values: Vec<Option<f64>> = matches
        .get_many::<Option<f64>>("values")
        .map(|values| values.copied().collect())
        .unwrap_or_default();
    let policy = *matches.get_one::<MissingPolicy>("missing").unwrap();

    let grid = Grid::reshape(&values, width, height, policy)?;

    let mut cmap = matches.get_one::<ColorMap>("cmap").unwrap().clone();
    if let Some(n) = matches.get_one::<usize>("clut") {
        cmap = cmap.resampled(*n);
    }

    let mut options = HeatMapOptionsBuilder::default();
    options
        .x_ticks(ticks(matches, "xticks"))
        .y_ticks(ticks(matches, "yticks"))
        .overlay(matches.get_flag("overlay"));
    if let Some(title) = matches.get_one::<String>("title") {
        options.title(title);
    }
    if let Some(label) = matches.get_one::<String>("xlabel") {
        options.x_label(label);
    }
    if let Some(label) = matches.get_one::<String>("ylabel") {
        options.y_label(label);
    }
    if matches.get_flag("cbar") {
        options.color_bar(ColorBar {
            label: matches.get_one::<String>("cbarlabel").cloned(),
            ticks: ticks(matches, "cbarticks"),
            orientation: *matches.get_one::<Orientation>("cbardir").unwrap(),
        });
    }

    let heat_map = HeatMap::new(
        grid,
        cmap,
        matches.get_one::<f64>("cbarmin").copied(),
        matches.get_one::<f64>("cbarmax").copied(),
        options.build()?,
    );

    let output = output_from_matches(matches, "heat-map", SMALL_FIGSIZE)?;
    save(&heat_map, &output)
}
