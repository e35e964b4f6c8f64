use anyhow::Result;
use clap::Parser;
use placeholder_icons::{font::DEFAULT_SCALABLE_FONT, icon_gen};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "placeholder-icons",
    about = "Generate placeholder extension icons with a centered text label"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Icon sizes to generate, in pixels.
    #[clap(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        default_values_t = icon_gen::DEFAULT_SIZES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    sizes: Vec<u32>,

    /// Label drawn in the middle of every icon
    #[clap(short, long, default_value = icon_gen::DEFAULT_LABEL)]
    text: String,

    /// The background color (CSS color format)
    #[clap(long, default_value = icon_gen::DEFAULT_BG_COLOR)]
    bg_color: String,

    /// The label color (CSS color format)
    #[clap(long, default_value = icon_gen::DEFAULT_TEXT_COLOR)]
    text_color: String,

    /// Preferred scalable font, sized at a third of each icon.
    #[clap(long, value_name = "PATH", default_value = DEFAULT_SCALABLE_FONT)]
    font: PathBuf,

    /// Print which font each icon was rendered with
    #[clap(short, long)]
    verbose: bool,
}

impl From<Args> for icon_gen::Args {
    fn from(args: Args) -> Self {
        Self {
            output: args.output,
            sizes: args.sizes,
            text: args.text,
            bg_color: args.bg_color,
            text_color: args.text_color,
            font: args.font,
            verbose: args.verbose,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(args.into())
}
