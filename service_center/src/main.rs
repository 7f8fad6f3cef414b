use std::env;
use std::io;

use log::{error, info, warn};
use service_center::{
    ConsoleObserver, RandomWorkload, SimError, Simulation, SimulationConfig, StopSignal,
    ThreadPause,
};

const USAGE: &str = "Usage: service_center [--seed <u64>]";

fn parse_seed(args: &[String]) -> Result<Option<u64>, SimError> {
    match args {
        [] => Ok(None),
        [flag, value] if flag == "--seed" => value
            .parse()
            .map(Some)
            .map_err(|e| SimError::Usage(format!("bad seed {:?}: {}", value, e))),
        _ => Err(SimError::Usage(USAGE.to_string())),
    }
}

fn run(args: &[String]) -> Result<(), SimError> {
    let mut config = SimulationConfig::baseline();
    if let Some(seed) = parse_seed(args)? {
        config = config.with_seed(seed);
    }

    let stop = StopSignal::new();
    let handle = stop.clone();
    ctrlc::set_handler(move || {
        if handle.is_triggered() {
            warn!("already stopping, waiting for queued requests");
        }
        handle.trigger();
    })?;

    let workload = RandomWorkload::from_config(&config)?;
    let simulation = Simulation::new(config, workload, ThreadPause, stop)?;

    let mut console = ConsoleObserver::new(io::stdout().lock());
    let summary = simulation.run(&mut console)?;

    info!(
        "peak queue depth {}, mean wait {:?}, mean work {:?}",
        summary.stats.max_depth,
        summary.stats.mean_wait(),
        summary.stats.mean_work()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return;
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn seed_is_optional() {
        assert_eq!(parse_seed(&args(&[])).unwrap(), None);
        assert_eq!(parse_seed(&args(&["--seed", "42"])).unwrap(), Some(42));
    }

    #[test]
    fn rejects_unknown_arguments() {
        assert!(matches!(
            parse_seed(&args(&["--ticks", "5"])),
            Err(SimError::Usage(_))
        ));
        assert!(matches!(
            parse_seed(&args(&["--seed", "abc"])),
            Err(SimError::Usage(_))
        ));
    }
}
