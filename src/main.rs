use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use schoolnet::cli::commands::execute_command;
use schoolnet::cli::{output, Cli, CliError};
use schoolnet::config::Settings;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => match &cli.data_dir {
            Some(dir) => s.with_data_dir(dir),
            None => s,
        },
        Err(e) => exit_with(CliError::from(e)),
    };
    tracing::debug!(?settings, "effective settings");

    if let Err(e) = execute_command(&cli, settings) {
        exit_with(e);
    }
}

fn exit_with(e: CliError) -> ! {
    output::error(&e);
    std::process::exit(e.exit_code());
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -v -v -v");
            LevelFilter::TRACE
        }
    };

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolnet::util::testing;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        testing::init_test_setup();
        Cli::command().debug_assert();
    }

    #[test]
    fn given_move_args_when_parsing_then_root_sentinel_recognized() {
        let cli = Cli::try_parse_from([
            "schoolnet", "chart", "move", "h1", "--from", "p", "--from-index", "0", "--to",
            "root", "--to-index", "1",
        ])
        .unwrap();
        match cli.command {
            Some(schoolnet::cli::Commands::Chart {
                command: schoolnet::cli::args::ChartCommands::Move { to, .. },
            }) => assert_eq!(to, schoolnet::domain::ParentRef::Root),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
