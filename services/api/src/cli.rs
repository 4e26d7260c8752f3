use crate::preview::{run_preview, PreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use contact_relay::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "contact-relay",
    about = "Serve the contact form endpoint or preview how a submission is processed",
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
    /// Sanitize, validate and compose a submission offline without sending it
    Preview(PreviewArgs),
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
        Command::Preview(args) => run_preview(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["contact-relay"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_preview_arguments() {
        let cli = Cli::try_parse_from(["contact-relay", "preview", "--input", "-", "--locale", "en"])
            .expect("parses");
        match cli.command {
            Some(Command::Preview(args)) => {
                assert_eq!(args.input.to_str(), Some("-"));
                assert_eq!(args.locale.as_deref(), Some("en"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from(["contact-relay", "serve", "--port", "8080"]).expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(8080)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
