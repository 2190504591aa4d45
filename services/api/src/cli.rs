use crate::report::{run_import, run_queue, run_roster, ImportArgs, RosterArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pab_roster::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "PAB Roster",
    about = "Serve and inspect the PAB membership roster from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Import a roster spreadsheet export into the member store
    Import(ImportArgs),
    /// Print the finalist or status board view of the roster
    Roster(RosterArgs),
    /// Print the pending interview queue
    Queue,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Import(args) => run_import(args),
        Command::Roster(args) => run_roster(args),
        Command::Queue => run_queue(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["pab-roster-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn roster_arguments_use_domain_parsers() {
        let cli = Cli::try_parse_from([
            "pab-roster-api",
            "roster",
            "--view",
            "finalists",
            "--category",
            "baik",
            "--sort",
            "nama",
            "--desc",
        ])
        .expect("parses");
        let Some(Command::Roster(args)) = cli.command else {
            panic!("expected roster command");
        };
        assert!(args.desc);
        assert!(args.sort.is_some());

        let rejected = Cli::try_parse_from(["pab-roster-api", "roster", "--category", "hebat"]);
        assert!(rejected.is_err());
    }
}
