use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Serve { port: Option<u16> },
    Estimate { agent_id: String },
    Help,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub db_path: Option<PathBuf>,
}

pub fn parse_args<I>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut port = None;
    let mut db_path = None;
    let mut agent_id = None;

    let subcommand = match args.next() {
        Some(arg) if arg == "--help" || arg == "-h" => {
            return Ok(CliArgs {
                command: Command::Help,
                db_path: None,
            });
        }
        Some(arg) => arg,
        None => return Err("missing command".to_string()),
    };
    if subcommand != "serve" && subcommand != "estimate" {
        return Err(format!("unknown command: {subcommand}"));
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" if subcommand == "serve" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --port".to_string())?;
                let parsed = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port value: {value}"))?;
                port = Some(parsed);
            }
            "--db" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --db".to_string())?;
                db_path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                return Ok(CliArgs {
                    command: Command::Help,
                    db_path: None,
                });
            }
            _ if subcommand == "estimate" && agent_id.is_none() && !arg.starts_with('-') => {
                agent_id = Some(arg);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    let command = if subcommand == "serve" {
        Command::Serve { port }
    } else {
        let agent_id = agent_id.ok_or_else(|| "missing <agent_id> for estimate".to_string())?;
        Command::Estimate { agent_id }
    };

    Ok(CliArgs { command, db_path })
}

pub fn print_help() {
    println!(
        "Agent Ledger CLI\n\n\
Usage:\n  agent-ledger serve [--port <port>] [--db <path>]\n  agent-ledger estimate <agent_id> [--db <path>]\n\n\
Options:\n  --port <port>  Override the configured port for this run only\n  --db <path>    Use this SQLite file instead of the configured data dir\n  -h, --help     Show this help message\n"
    );
}
