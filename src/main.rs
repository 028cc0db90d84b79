#[macro_use]
extern crate anyhow;
extern crate clap;

#[macro_use]
extern crate derive_builder;

#[macro_use]
extern crate serde_derive;

use std::env;

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};

mod bench;
mod cli;
mod colormap;
mod command;
mod error;
mod extract;
mod grid;
mod group;
mod input;
mod record;
mod render;
mod series;

fn main() {
    let result = try_main();
    match result {
        Err(e) => {
            eprintln!("benchplot: error: {e:#}");
            std::process::exit(1);
        }
        Ok(code) => std::process::exit(code),
    };
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // RUST_LOG, when set, wins over -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn try_main() -> Result<i32> {
    let matches = cli::clap().get_matches();

    init_logging(matches.get_count("verbose"));

    // neither needs input data nor the working directory
    match matches.subcommand() {
        Some(("completion", matches)) => {
            if let Some(shell) = matches.get_one::<clap_complete::Shell>("generator") {
                print_completions(*shell);
            }
            return Ok(0);
        }
        Some(("manpages", matches)) => {
            let outdir = matches.get_one::<Utf8PathBuf>("outdir").unwrap();
            write_manpages(outdir)?;
            return Ok(0);
        }
        _ => (),
    }

    if let Some(dir) = matches.get_one::<Utf8PathBuf>("chdir") {
        env::set_current_dir(dir).context(format!("cannot change to directory \"{dir}\""))?;
    }

    match matches.subcommand() {
        Some(("bench", matches)) => command::bench::from_matches(matches)?,
        Some(("plot", matches)) => command::plot::from_matches(matches)?,
        Some(("commit", matches)) => command::commit::from_matches(matches)?,
        Some(("bar", matches)) => command::bar::from_matches(matches)?,
        Some(("heat-map", matches)) => command::heat_map::from_matches(matches)?,
        Some(("image", matches)) => command::image::from_matches(matches)?,
        _ => unreachable!(),
    }

    Ok(0)
}

fn print_completions(shell: clap_complete::Shell) {
    let mut cmd = cli::clap();
    let name = cmd.get_name().to_string();
    log::info!("generating {shell} completions for {name}");
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// `benchplot.1`, plus `benchplot-<subcommand>.1` for every visible
/// subcommand.
fn write_manpages(outdir: &Utf8Path) -> Result<()> {
    let cmd = cli::clap();
    let pages = std::iter::once(("benchplot.1".to_string(), cmd.clone())).chain(
        cmd.get_subcommands()
            .filter(|sub| !sub.is_hide_set())
            .map(|sub| (format!("benchplot-{}.1", sub.get_name()), sub.clone())),
    );

    for (file, page) in pages {
        let path = outdir.join(file);
        let mut buffer = Vec::new();
        clap_mangen::Man::new(page).render(&mut buffer)?;
        std::fs::write(&path, buffer).with_context(|| format!("writing \"{path}\""))?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    #[test]
    fn test_clap() {
        crate::cli::clap().debug_assert();
    }

    #[test]
    fn manpages() {
        let dir = tempfile::tempdir().unwrap();
        let outdir = camino::Utf8Path::from_path(dir.path()).unwrap();
        super::write_manpages(outdir).unwrap();
        assert!(outdir.join("benchplot.1").exists());
        assert!(outdir.join("benchplot-heat-map.1").exists());
        assert!(!outdir.join("benchplot-completion.1").exists());
    }
}
