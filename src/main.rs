//! Simulator entry point — CLI wiring and scenario-driven engine construction.

use std::path::Path;
use std::process;

use waternet_sim::config::ScenarioConfig;
use waternet_sim::io::export_csv;
use waternet_sim::scenario::Scenario;
use waternet_sim::sim::{Engine, KpiReport};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    flows_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("waternet-sim — Water distribution network min-cost flow simulator");
    eprintln!();
    eprintln!("Usage: waternet-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load run configuration from a TOML file");
    eprintln!(
        "  --preset <name>     Use a built-in preset ({})",
        Scenario::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>        Override the preset demand seed");
    eprintln!("  --flows-out <path>  Export per-arc flows to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve             Start REST API server after the run");
        eprintln!("  --port <u16>        API server port (default: 3000)");
    }
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the demo preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        flows_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--flows-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --flows-out requires a path argument");
                    process::exit(1);
                }
                cli.flows_out = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Builds the engine: --scenario takes priority, then --preset, then demo.
fn build_engine(cli: &CliArgs) -> Engine {
    let mut config = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::default()
    };

    if let Some(seed) = cli.seed_override {
        config.simulation.seed = seed;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // A scenario file with [paths] loads CSV data; otherwise fall back to a
    // preset (the config seed feeds its synthetic demand).
    let scenario = if config.paths.is_some() {
        Scenario::from_config(config)
    } else {
        let preset = cli.preset.as_deref().unwrap_or("demo");
        Scenario::from_preset(preset, config)
    };
    let scenario = match scenario {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    match scenario.build_engine() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn main() {
    let cli = parse_args();

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --scenario and --preset are mutually exclusive");
        process::exit(1);
    }

    let engine = build_engine(&cli);

    let steps = match engine.run() {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    let kpi = KpiReport::from_steps(&steps);

    // Print per-step results
    for s in &steps {
        println!("{s}");
    }

    // Print KPI report
    println!("\n{kpi}");

    // Export CSV if requested
    if let Some(ref path) = cli.flows_out {
        if let Err(e) = export_csv(&steps, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Flows written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(waternet_sim::api::AppState {
            network: waternet_sim::api::NetworkSummary::from_network(engine.network()),
            kpi,
            steps,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(waternet_sim::api::serve(state, addr));
    }
}
