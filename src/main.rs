use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tzconv::{CivilDateTime, ConvertedView, Converter};

#[derive(Parser)]
#[command(name = "tzconv", version, about = "Convert wall-clock times between time zones")]
struct Cli {
    /// Source zone for a one-shot conversion
    #[arg(long)]
    from: Option<String>,

    /// Target zone for a one-shot conversion
    #[arg(long)]
    to: Option<String>,

    /// Civil date/time to convert, as YYYY-MM-DD HH:MM:SS
    #[arg(long)]
    at: Option<String>,
}

fn init_logger() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tzconv=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Split the canonical `YYYY-MM-DD HH:MM:SS` layout into raw fields. Range
/// checking is the core's job; this only takes the text apart.
fn parse_civil(input: &str) -> Option<CivilDateTime> {
    let mut fields = input
        .trim()
        .split(|c: char| matches!(c, '-' | ' ' | ':' | 'T'))
        .filter(|part| !part.is_empty());

    let year: i32 = fields.next()?.parse().ok()?;
    let month: u8 = fields.next()?.parse().ok()?;
    let day: u8 = fields.next()?.parse().ok()?;
    let hour: u8 = fields.next()?.parse().ok()?;
    let minute: u8 = fields.next()?.parse().ok()?;
    let second: u8 = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(CivilDateTime::new(year, month, day, hour, minute, second))
}

fn render(view: &ConvertedView) {
    println!("{}  {}", view.from.civil(), view.from.zone());
    println!("{}  {}", view.to.civil(), view.to.zone());
}

fn run_once(cli: &Cli) -> ExitCode {
    let mut conv = match Converter::with_defaults() {
        Ok(conv) => conv,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    // Source zone first, so the date is interpreted in it.
    let result = (|| {
        if let Some(from) = &cli.from {
            conv.set_source_zone(from)?;
        }
        if let Some(at) = &cli.at {
            let fields = parse_civil(at).ok_or_else(|| tzconv::ConvertError::InvalidCivilTime {
                reason: format!("expected YYYY-MM-DD HH:MM:SS, got {at:?}"),
            })?;
            conv.set_civil_date_time(fields)?;
        }
        if let Some(to) = &cli.to {
            conv.set_target_zone(to)?;
        }
        Ok::<_, tzconv::ConvertError>(())
    })();

    match result {
        Ok(()) => {
            render(&conv.derive());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}

fn print_help() {
    println!("  show                       current conversion");
    println!("  date YYYY-MM-DD HH:MM:SS   set the wall-clock reading (in the source zone)");
    println!("  from <zone>                reinterpret the reading in another source zone");
    println!("  to <zone>                  pick the target zone");
    println!("  swap                       exchange source and target");
    println!("  now                        set the reading to the current time");
    println!("  reset                      back to the defaults, at the current time");
    println!("  zones [text]               list zones, optionally filtered");
    println!("  local                      use this machine's zone as the source");
    println!("  help, quit");
}

fn handle_line(conv: &mut Converter, line: &str) -> bool {
    let (cmd, rest) = match line.split_once(' ') {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        "quit" | "exit" => return false,
        "help" => print_help(),
        "show" => render(&conv.derive()),
        "date" => match parse_civil(rest) {
            Some(fields) => match conv.set_civil_date_time(fields) {
                Ok(()) => render(&conv.derive()),
                Err(e) => eprintln!("{e}"),
            },
            None => eprintln!("expected: date YYYY-MM-DD HH:MM:SS"),
        },
        "from" => match conv.set_source_zone(rest) {
            Ok(()) => render(&conv.derive()),
            Err(e) => eprintln!("{e}"),
        },
        "to" => match conv.set_target_zone(rest) {
            Ok(()) => render(&conv.derive()),
            Err(e) => eprintln!("{e}"),
        },
        "swap" => {
            conv.swap();
            render(&conv.derive());
        }
        "now" => match conv.set_to_now() {
            Ok(()) => render(&conv.derive()),
            Err(e) => eprintln!("{e}"),
        },
        "reset" => match conv.reset_to_now() {
            Ok(()) => render(&conv.derive()),
            Err(e) => eprintln!("{e}"),
        },
        "zones" => {
            if rest.is_empty() {
                for zone in conv.catalog().all() {
                    println!("{zone}");
                }
            } else {
                for zone in conv.catalog().search(rest) {
                    println!("{zone}");
                }
            }
        }
        "local" => {
            let host = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
            match conv.set_source_zone(&host) {
                Ok(()) => render(&conv.derive()),
                Err(e) => eprintln!("{e}"),
            }
        }
        other => eprintln!("unknown command: {other} (try `help`)"),
    }
    true
}

fn run_repl() -> ExitCode {
    let mut conv = match Converter::with_defaults() {
        Ok(conv) => conv,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("tzconv v{}", env!("CARGO_PKG_VERSION"));
    println!("Type `help` for commands. Press Ctrl-D to exit.");
    render(&conv.derive());

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() && !handle_line(&mut conv, trimmed) {
                    break;
                }
            }
            Err(e) => {
                eprintln!("Read error: {e}");
                return ExitCode::from(1);
            }
        }
    }

    println!();
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    init_logger();

    let cli = Cli::parse();
    if cli.from.is_some() || cli.to.is_some() || cli.at.is_some() {
        return run_once(&cli);
    }

    run_repl()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_canonical_layout() {
        let c = parse_civil("2024-01-02 03:04:05").unwrap();
        assert_eq!(c, CivilDateTime::new(2024, 1, 2, 3, 4, 5));
    }

    #[test]
    fn parses_t_separator_and_surrounding_space() {
        let c = parse_civil("  2024-01-02T03:04:05 ").unwrap();
        assert_eq!(c, CivilDateTime::new(2024, 1, 2, 3, 4, 5));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_civil("2024-01-02").is_none());
        assert!(parse_civil("2024-01-02 03:04:05:06").is_none());
        assert!(parse_civil("not a date").is_none());
    }

    #[test]
    fn leaves_range_checks_to_the_core() {
        // Splits fine; the converter is what rejects month 13.
        assert!(parse_civil("2024-13-02 03:04:05").is_some());
    }
}
