use std::str::FromStr;

use camino::Utf8PathBuf;

use clap::{crate_version, value_parser, Arg, ArgAction, Command, ValueHint};

use crate::bench::BenchKind;
use crate::colormap::ColorMap;
use crate::grid::MissingPolicy;
use crate::input::{parse_cell, RgbaImage, Tick};
use crate::render::{Orientation, Scale};

pub fn clap() -> clap::Command {
    fn data() -> Arg {
        Arg::new("data")
            .help("the data to plot, as a JSON document")
            .required(true)
            .num_args(1)
    }

    fn title() -> Arg {
        Arg::new("title")
            .help("the title of the plot")
            .short('t')
            .long("title")
            .num_args(1)
    }

    fn scale(id: &'static str, short: char, default: &'static str) -> Arg {
        Arg::new(id)
            .help(format!("the {} scale of the plot", &id[..1]))
            .short(short)
            .long(id)
            .num_args(1)
            .value_name("SCALE")
            .default_value(default)
            .value_parser(Scale::from_str)
    }

    fn fullscreen() -> Arg {
        Arg::new("fullscreen")
            .help("use the whole figure, with small margins")
            .long("fullscreen")
            .action(ArgAction::SetTrue)
    }

    fn save() -> Arg {
        Arg::new("save")
            .help("a path to save the figure to (.svg for SVG, PNG otherwise)")
            .short('s')
            .long("save")
            .num_args(1)
            .value_name("PATH")
            .value_parser(clap::value_parser!(Utf8PathBuf))
            .value_hint(ValueHint::FilePath)
    }

    fn figsize() -> Arg {
        Arg::new("figsize")
            .help("figure width and height in inches")
            .long("figsize")
            .num_args(2)
            .value_names(["WIDTH", "HEIGHT"])
            .value_parser(clap::value_parser!(f64))
    }

    fn dpi(default: &'static str) -> Arg {
        Arg::new("dpi")
            .help("pixels per inch of the saved figure")
            .long("dpi")
            .env("BENCHPLOT_DPI")
            .num_args(1)
            .default_value(default)
            .value_parser(clap::value_parser!(u32).range(1..))
    }

    fn ticks(id: &'static str, help: &'static str) -> Arg {
        Arg::new(id)
            .help(help)
            .long(id)
            .num_args(1..)
            .value_name("POS:LABEL")
            .allow_negative_numbers(true)
            .value_parser(Tick::from_str)
    }

    fn label(id: &'static str, help: &'static str) -> Arg {
        Arg::new(id).help(help).long(id).num_args(1)
    }

    Command::new("benchplot")
        .version(crate_version!())
        .about("Plot benchmark results")
        .infer_subcommands(true)
        .subcommand_required(true)
        .arg(
            Arg::new("chdir")
                .short('C')
                .long("chdir")
                .help("change working directory before doing anything else")
                .global(true)
                .required(false)
                .value_parser(clap::value_parser!(Utf8PathBuf))
                .value_hint(ValueHint::DirPath)
                .num_args(1),
        )
        .arg(
            Arg::new("verbose")
                .help("be verbose (repeat for more)")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("save-dir")
                .help("directory for relative output paths")
                .long("save-dir")
                .env("BENCHPLOT_SAVE_DIR")
                .global(true)
                .num_args(1)
                .value_name("DIR")
                .value_parser(clap::value_parser!(Utf8PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .subcommand(
            Command::new("bench")
                .about("plot criterion results (one JSON object per line)")
                .arg(
                    Arg::new("filename")
                        .help("the results file")
                        .required(true)
                        .value_parser(clap::value_parser!(Utf8PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("bench")
                        .help("benchmarks to plot")
                        .short('b')
                        .long("bench")
                        .action(ArgAction::Append)
                        .value_delimiter(',')
                        .default_value("linalg")
                        .value_parser(BenchKind::from_str),
                )
                .arg(
                    Arg::new("all")
                        .help("plot every benchmark")
                        .short('a')
                        .long("all")
                        .conflicts_with("bench")
                        .action(ArgAction::SetTrue),
                )
                .arg(title())
                .arg(scale("x-scale", 'X', "linear"))
                .arg(scale("y-scale", 'Y', "log"))
                .next_help_heading("Output")
                .arg(save())
                .arg(figsize())
                .arg(dpi("100")),
        )
        .subcommand(
            Command::new("plot")
                .about("plot groups of measurements with error bands")
                .arg(data())
                .arg(title())
                .arg(
                    Arg::new("x-label")
                        .help("the x label of the plot")
                        .short('x')
                        .long("x-label")
                        .num_args(1),
                )
                .arg(
                    Arg::new("y-label")
                        .help("the y label of the plot")
                        .short('y')
                        .long("y-label")
                        .num_args(1),
                )
                .arg(scale("x-scale", 'X', "linear"))
                .arg(scale("y-scale", 'Y', "linear"))
                .arg(fullscreen())
                .next_help_heading("Output")
                .arg(save())
                .arg(figsize())
                .arg(dpi("100")),
        )
        .subcommand(
            Command::new("commit")
                .about("plot commit times per curve")
                .arg(data())
                .arg(title().default_value("time to commit polynomials for certain curves"))
                .next_help_heading("Output")
                .arg(save())
                .arg(figsize())
                .arg(dpi("100")),
        )
        .subcommand(
            Command::new("bar")
                .about("plot a multi-bar chart")
                .arg(data())
                .arg(title())
                .arg(
                    Arg::new("y-label")
                        .help("the measurement label of the chart")
                        .short('l')
                        .long("label")
                        .num_args(1),
                )
                .arg(fullscreen())
                .next_help_heading("Output")
                .arg(save())
                .arg(figsize())
                .arg(dpi("100")),
        )
        .subcommand(
            Command::new("heat-map")
                .about("plot values as a grid of coloured cells")
                .arg(
                    Arg::new("values")
                        .help("cell values, row by row (`null` for a missing value)")
                        .num_args(0..)
                        .allow_negative_numbers(true)
                        .value_parser(parse_cell),
                )
                .arg(
                    Arg::new("width")
                        .help("number of columns")
                        .short('W')
                        .long("width")
                        .required(true)
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("height")
                        .help("number of rows")
                        .short('H')
                        .long("height")
                        .required(true)
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("missing")
                        .help("how to handle missing values")
                        .long("missing")
                        .value_name("POLICY")
                        .default_value("nan")
                        .value_parser(MissingPolicy::from_str),
                )
                .arg(
                    Arg::new("title")
                        .help("the title of the plot")
                        .long("title")
                        .num_args(1),
                )
                .arg(label("xlabel", "label of the x axis"))
                .arg(ticks("xticks", "custom x ticks, in columns"))
                .arg(label("ylabel", "label of the y axis"))
                .arg(ticks("yticks", "custom y ticks, in rows"))
                .arg(
                    Arg::new("overlay")
                        .help("print each value inside its cell")
                        .long("overlay")
                        .action(ArgAction::SetTrue),
                )
                .next_help_heading("Colours")
                .arg(
                    Arg::new("cmap")
                        .help("colour map name, or a JSON list of RGB(A) colours")
                        .long("cmap")
                        .num_args(1)
                        .default_value("plasma")
                        .value_parser(ColorMap::from_str),
                )
                .arg(
                    Arg::new("clut")
                        .help("resample the colour map to N discrete colours")
                        .long("clut")
                        .value_name("N")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("cbar")
                        .help("draw a colour bar")
                        .long("cbar")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("cbarmin")
                        .help("value mapped to the lowest colour")
                        .long("cbarmin")
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("cbarmax")
                        .help("value mapped to the highest colour")
                        .long("cbarmax")
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(ticks("cbarticks", "custom colour bar ticks, in values"))
                .arg(label("cbarlabel", "label of the colour bar"))
                .arg(
                    Arg::new("cbardir")
                        .help("orientation of the colour bar")
                        .long("cbardir")
                        .default_value("vertical")
                        .value_parser(Orientation::from_str),
                )
                .next_help_heading("Output")
                .arg(save())
                .arg(figsize())
                .arg(dpi("300")),
        )
        .subcommand(
            Command::new("image")
                .about("preview an RGB(A) image given as a JSON array")
                .arg(
                    Arg::new("values")
                        .help("rows of pixels, `[[[r, g, b(, a)], ..], ..]`")
                        .required(true)
                        .value_parser(RgbaImage::from_str),
                )
                .next_help_heading("Output")
                .arg(save())
                .arg(figsize())
                .arg(dpi("300")),
        )
        .subcommand(
            Command::new("completion")
                .about("Generate benchplot shell completions.")
                .arg(
                    Arg::new("generator")
                        .help("shell to generate completions for")
                        .long("generate")
                        .value_parser(value_parser!(clap_complete::Shell)),
                )
                .hide(true),
        )
        .subcommand(
            Command::new("manpages")
                .about("Generate benchplot manpages.")
                .arg(
                    Arg::new("outdir")
                        .help("directory in which to create manpage files")
                        .value_parser(value_parser!(Utf8PathBuf))
                        .value_hint(ValueHint::DirPath)
                        .required(true),
                )
                .hide(true),
        )
}
