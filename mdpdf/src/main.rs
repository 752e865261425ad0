use color_eyre::eyre::Result;
use log::LevelFilter;
use mdpdf::{cli::Cli, commands};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Auto)
    .init();

  commands::run(&cli)
}
