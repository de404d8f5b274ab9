//! Terminal client that keeps one stop query live.
//!
//! Each line read from stdin replaces the watched stops. A line starting
//! with `+` toggles its stops in or out instead, and an empty line stops
//! watching.

use mystops::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

const NO_DISTANCE: &str = "--";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    let client = match TriMetClient::new(&config) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to create TriMet client: {err}");
            std::process::exit(1);
        }
    };

    let mut session = Session::new(client, &config);
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            error!("{message}");
            std::process::exit(1);
        }
    };
    if let Some(routes) = &args.routes {
        match RouteFilter::parse(routes) {
            Ok(routes) => session = session.with_routes(routes),
            Err(err) => {
                print_problem(&err.problem(config.debug));
                std::process::exit(1);
            }
        }
    }
    if let Some(stops) = &args.stops {
        handle_line(&mut session, stops, config.debug);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => handle_line(&mut session, &line, config.debug),
                Ok(None) => break,
                Err(err) => {
                    error!("Failed to read input: {err}");
                    break;
                }
            },
            delivery = session.next() => print_delivery(&delivery, config.debug),
        }
    }
}

/// `mystops-watch [stop ids] [--routes <route ids>]`, in any order.
#[derive(Debug, Default, PartialEq)]
struct Args {
    stops: Option<String>,
    routes: Option<String>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--routes" {
                let routes = args.next().ok_or("--routes needs a list of route ids")?;
                parsed.routes = Some(routes);
            } else if arg.starts_with("--") {
                return Err(format!("unknown option {arg}"));
            } else if parsed.stops.is_none() {
                parsed.stops = Some(arg);
            } else {
                return Err(format!("unexpected argument {arg}"));
            }
        }
        Ok(parsed)
    }
}

fn handle_line(session: &mut Session<TriMetClient>, line: &str, debug: bool) {
    let line = line.trim();
    let submitted = match line.strip_prefix('+') {
        Some(term) => session.toggle(term),
        None => session.submit(line),
    };
    match submitted {
        Ok(Submission::Issued(ticket)) => println!("Watching stops {}...", ticket.stops),
        Ok(Submission::Unchanged) => {}
        Ok(Submission::Cleared) => println!("Stopped watching"),
        Err(err) => print_problem(&err.problem(debug)),
    }
}

fn print_delivery(delivery: &Delivery, debug: bool) {
    match delivery {
        Delivery::Arrivals(arrivals) => print_arrivals(arrivals),
        Delivery::NoMatch(err) => print_problem(&err.problem(debug)),
        Delivery::Failed(err) => {
            print_problem(&err.problem(debug));
            println!("Refreshing stopped, enter stops to try again");
        }
    }
}

fn print_arrivals(arrivals: &Arrivals) {
    println!("\nUpdated {}", arrivals.update_time);
    for stop in &arrivals.stops {
        println!("{} ({})", stop.name, stop.id);
        for route in &stop.routes {
            println!("  {}", route.name);
            for arrival in &route.arrivals {
                let distance = Distance::from_feet(arrival.distance_away.feet);
                let distance = if distance.is_zero() {
                    NO_DISTANCE.to_string()
                } else {
                    distance.to_string()
                };
                let marker = match arrival.designation {
                    Some(Designation::Red) => "!!!",
                    Some(Designation::Orange) => "!! ",
                    Some(Designation::Yellow) => "!  ",
                    None => "   ",
                };
                println!("    {marker} {:<32} {distance}", arrival.status);
            }
        }
    }
}

fn print_problem(problem: &Problem) {
    println!("{}: {}", problem.title, problem.explanation);
    if let Some(detail) = &problem.detail {
        println!("  {detail}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        Args::parse(list.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn stops_may_follow_routes() {
        let parsed = args(&["--routes", "4", "8989,2"]).unwrap();
        assert_eq!(parsed.stops.as_deref(), Some("8989,2"));
        assert_eq!(parsed.routes.as_deref(), Some("4"));
    }

    #[test]
    fn stops_may_precede_routes() {
        let parsed = args(&["8989", "--routes", "4,75"]).unwrap();
        assert_eq!(parsed.stops.as_deref(), Some("8989"));
        assert_eq!(parsed.routes.as_deref(), Some("4,75"));
    }

    #[test]
    fn routes_without_value_is_rejected() {
        assert!(args(&["8989", "--routes"]).is_err());
    }

    #[test]
    fn no_arguments_watch_nothing() {
        assert_eq!(args(&[]).unwrap(), Args::default());
    }
}
