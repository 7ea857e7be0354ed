use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use log::info;
use pkgsweep::{config::Config, utils::format_duration, Session, SweepError, TermuxPkg};
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));
    if matches.get_flag("no-color") {
        colored::control::set_override(false);
    }
    let start_time = Instant::now();

    if let Err(e) = run(&matches) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        if let Some(hint) = setup_hint(&e) {
            eprintln!("{}", hint.yellow());
        }
        std::process::exit(1);
    }

    info!(
        "Operation completed in {}",
        format_duration(start_time.elapsed().as_secs())
    );
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn build_cli() -> Command {
    Command::new("pkgsweep")
        .version(pkgsweep::PKGSWEEP_VERSION)
        .about("Installs every available Termux package, skipping a blacklist and logging each outcome.")
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .help("Enable debug logging"))
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("CONFIG")
            .help("TOML configuration file"))
        .arg(Arg::new("blacklist-file")
            .long("blacklist-file")
            .value_name("FILE")
            .help("Blacklist file, one package per line"))
        .arg(Arg::new("log-dir")
            .long("log-dir")
            .value_name("DIR")
            .help("Directory for the success and failure logs"))
        .arg(Arg::new("no-prompt")
            .long("no-prompt")
            .action(ArgAction::SetTrue)
            .help("Do not ask for extra blacklist entries"))
        .arg(Arg::new("no-color")
            .long("no-color")
            .action(ArgAction::SetTrue))
}

fn setup_hint(err: &SweepError) -> Option<&'static str> {
    err.is_setup_error()
        .then_some("Check the files named by --config, --blacklist-file and --log-dir.")
}

fn load_config(matches: &ArgMatches) -> pkgsweep::SweepResult<Config> {
    let mut config = Config::load(matches.get_one::<String>("config").map(String::as_str))?;
    if let Some(path) = matches.get_one::<String>("blacklist-file") {
        config.blacklist_file = PathBuf::from(path);
    }
    if let Some(dir) = matches.get_one::<String>("log-dir") {
        config.log_dir = PathBuf::from(dir);
    }
    if matches.get_flag("no-prompt") {
        config.prompt = false;
    }
    Ok(config)
}

fn run(matches: &ArgMatches) -> pkgsweep::SweepResult<()> {
    let config = load_config(matches)?;
    let manager = TermuxPkg::new();
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    // Failed packages are reported in the logs; they never change the exit
    // status.
    Session::new(&config, &manager).run(&mut input)?;
    Ok(())
}
