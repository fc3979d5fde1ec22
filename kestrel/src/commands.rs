use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("kestrel")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("kestrel")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug)")
                .required(false)
                .action(clap::ArgAction::Count),
        )
        .subcommand_required(false)
        .subcommand(
            command!("scan")
                .about(
                    "Crawl a target on its own host, probe forms and query parameters, and \
                report reflected XSS, SQL error leakage and missing CSRF tokens.",
                )
                .arg(
                    arg!([TARGET])
                        .required(false)
                        .help("The root URL to scan")
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of URLs to scan")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("TARGET"),
                )
                .arg(
                    arg!(-p --"max-pages" <NUM_PAGES>)
                        .required(false)
                        .help("Maximum number of pages to fetch per target")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(-o --"output-dir" <PATH>)
                        .required(false)
                        .help("Directory the JSON report files are written to")
                        .default_value("reports"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Format of the report printed to stdout: json, text")
                        .value_parser(["json", "text"])
                        .default_value("json"),
                ),
        )
}
