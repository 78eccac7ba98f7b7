use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("backscroll")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("backscroll")
        .styles(CLAP_STYLING)
        .subcommand_required(true)
        .subcommand(
            command!("replay")
                .about(
                    "Replays a recorded browsing session against a headless page and reports \
                what happened on each navigation.",
                )
                .arg(
                    arg!(<SESSION>)
                        .required(true)
                        .help("Path to the session JSON file")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("Settings file (default: ~/.config/backscroll/config.json if present)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-d --"debug")
                        .required(false)
                        .help("Log every poll and state transition")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("config")
                .about("Prints the effective settings as JSON")
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("Settings file (default: ~/.config/backscroll/config.json if present)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
