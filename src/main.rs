use anyhow::{Context, Result};
use log::info;
use qed::cli;
use qed::config::{QedConfig, find_config_file};
use qed::editor::Editor;
use qed::keymap::parse_key_script;

/// Entry point: parse arguments, initialise logging, build the editing session
/// from config, seed the document, replay the key script, and print the
/// resulting lines.
///
/// The point starts at the beginning of the seeded text, so a script acts the
/// way typing into a freshly opened document would.
fn main() -> Result<()> {
    let cli_args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error parsing arguments: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logger (set RUST_LOG env var to control verbosity)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config_path = cli_args.config.clone().or_else(find_config_file);
    let mut config = match &config_path {
        Some(path) => QedConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => QedConfig::default(),
    };
    if let Some(gap) = cli_args.initial_gap {
        config.initial_gap = gap;
    }

    let mut editor = Editor::new(&config).context("creating document buffer")?;
    editor
        .load_text(cli_args.initial_text())
        .context("seeding document text")?;
    editor.set_point(0)?;

    if let Some(script) = &cli_args.keys {
        let events = parse_key_script(script).context("parsing key script")?;
        for event in events {
            if editor.dispatch(event).context("applying key")? {
                info!("Exit requested");
                break;
            }
        }
    }

    let lines = if cli_args.show_point {
        editor.render_lines_marked("|")
    } else {
        editor.render_lines()
    };
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
