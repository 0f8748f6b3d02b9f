//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads (or generates) the dataset
//! - builds the derived views
//! - launches the TUI or prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ViewArgs};
use crate::data::Dataset;
use crate::domain::Selection;
use crate::error::AppError;
use crate::view;

/// Entry point for the `wd` binary.
pub fn run() -> Result<(), AppError> {
    // We want `wd` and `wd --demo` to behave like `wd tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Scatter(args) => handle_scatter(args),
        Command::Regions(args) => handle_regions(args),
        Command::Series(args) => handle_series(args),
    }
}

/// Load the dataset and resolve the initial selection against it.
///
/// The year is clamped into the dataset's coverage so a `--year` outside the
/// table columns starts on a populated view instead of an empty chart.
pub fn prepare(args: &ViewArgs) -> Result<(Dataset, Selection), AppError> {
    let dataset = if args.demo {
        crate::data::generate_dataset(args.demo_count, args.seed)?
    } else {
        let base = crate::data::resolve_base(args.data.as_deref());
        crate::data::load_dataset(&base)?
    };

    let mut selection = args.selection();
    selection.set_year(dataset.clamp_year(selection.year));
    Ok((dataset, selection))
}

fn handle_tui(args: ViewArgs) -> Result<(), AppError> {
    let (dataset, selection) = prepare(&args)?;
    crate::tui::run(dataset, selection)
}

fn handle_scatter(args: ViewArgs) -> Result<(), AppError> {
    let (dataset, selection) = prepare(&args)?;
    let scatter = view::scatter::build(&dataset, &selection);

    println!("{}", crate::report::format_scatter(&scatter, &selection));

    if let Some(path) = &args.export {
        crate::io::export::write_scatter_csv(path, &scatter, &selection)?;
    }
    if let Some(path) = &args.export_state {
        crate::io::export::write_selection_json(path, &selection)?;
    }

    Ok(())
}

fn handle_regions(args: ViewArgs) -> Result<(), AppError> {
    let (dataset, selection) = prepare(&args)?;
    let regions = view::bars::build(&dataset, &selection);
    println!("{}", crate::report::format_regions(&regions, &selection));
    Ok(())
}

fn handle_series(args: ViewArgs) -> Result<(), AppError> {
    let (dataset, selection) = prepare(&args)?;
    if selection.selected_country.is_none() {
        return Err(AppError::usage(
            "`wd series` needs a country: pass `-c <geo>` (geo codes are listed by `wd scatter`).",
        ));
    }
    let series = view::series::build(&dataset, &selection);
    println!("{}", crate::report::format_series(&series, &selection));
    Ok(())
}

/// Rewrite argv so `wd` defaults to `wd tui`.
///
/// Rules:
/// - `wd`                      -> `wd tui`
/// - `wd --demo ...`           -> `wd tui --demo ...`
/// - `wd --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "scatter" | "regions" | "series");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["wd"])), args(&["wd", "tui"]));
    }

    #[test]
    fn leading_flags_route_to_tui() {
        assert_eq!(
            rewrite_args(args(&["wd", "--demo"])),
            args(&["wd", "tui", "--demo"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["wd", "regions", "--bar", "gdp"])),
            args(&["wd", "regions", "--bar", "gdp"])
        );
        assert_eq!(rewrite_args(args(&["wd", "--help"])), args(&["wd", "--help"]));
    }
}
