use std::error::Error;
use std::path::PathBuf;

use cheat_sheet::CheatSheet;
use clap::Parser;

/// Renders a multi-column cheat sheet PDF from a content file and its design file.
///
/// The content file names its design file under `document setup`.  Fonts are looked up under
/// `assets/fonts` or the directory in `CHEAT_SHEET_FONTS_DIR`.
#[derive(Parser)]
#[command(author, version, about = "Render a cheat sheet PDF")]
struct Cli {
    /// Content file (.json, .yml or .yaml).
    #[arg(long = "contentfile", alias = "content-file", default_value = "content.json")]
    content_file: PathBuf,

    /// Directory the PDF is written to.
    #[arg(long = "output-dir", alias = "outputpath", default_value = "./pdfs/")]
    output_dir: PathBuf,
}

fn run(cli: &Cli) -> Result<PathBuf, cheat_sheet::Error> {
    let sheet = CheatSheet::load(&cli.content_file)?;
    sheet.write_to(&cli.output_dir)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(path) => println!("Generated {}", path.display()),
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
