use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scoreboard_client::HttpMatchStore;
use scoreboard_core::flows::FlowContext;
use scoreboard_core::flows::court_finish::finish;
use scoreboard_core::flows::court_status::resolve_param;
use scoreboard_core::flows::history::load_history;
use scoreboard_core::flows::join::join;
use scoreboard_core::flows::redirect::build_redirect_target;
use scoreboard_core::i18n::{Language, LanguageContext};
use scoreboard_core::logger::TracingLogger;
use scoreboard_core::store::MatchStore;

mod render;

#[derive(Parser)]
#[command(name = "scoreboard")]
#[command(about = "Operate a badminton scoreboard server", long_about = None)]
struct Cli {
    /// Scoreboard server URL
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Output language (en, es, de)
    #[arg(short, long, default_value = "en", value_parser = parse_language)]
    lang: Language,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show whether a court is free or has a match in progress
    Status { court: String },
    /// Finish the match on a court and free it
    Finish { court: String },
    /// Look up a match by its code
    Join { code: String },
    /// List every match, newest first
    History,
    /// Print the scoreboard URL a legacy /sb/{number} link resolves to
    Redirect {
        number: String,
        /// Query parameters as key=value
        params: Vec<String>,
    },
}

fn parse_language(code: &str) -> Result<Language, String> {
    Language::parse(code).ok_or_else(|| format!("unsupported language '{code}'"))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = HttpMatchStore::new(&cli.server);
    let lang = LanguageContext::new(cli.lang);
    let ctx = FlowContext::new(&store, &TracingLogger, &lang);

    match cli.command {
        Command::Status { court } => {
            let status = resolve_param(&ctx, &court).await;
            println!("{}", render::court_status(&lang, court.trim(), &status));
            ExitCode::SUCCESS
        }
        Command::Finish { court } => {
            let freed = finish(&ctx, &court).await;
            println!("{}", render::finish_result(&lang, court.trim(), freed));
            if freed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Join { code } => match join(&ctx, &code).await {
            Ok(id) => {
                println!("{}", lang.t_with("match.code", &[("code", &id)]));
                if let Ok(Some(m)) = store.get_match(&id).await {
                    println!("{}", render::match_line(&lang, &m));
                }
                ExitCode::SUCCESS
            }
            Err(failure) => {
                eprintln!("{}", lang.t(failure.message_key()));
                ExitCode::FAILURE
            }
        },
        Command::History => match load_history(&ctx).await {
            Ok(matches) => {
                println!("{}", render::history(&lang, &matches));
                ExitCode::SUCCESS
            }
            Err(message) => {
                eprintln!("{message}");
                ExitCode::FAILURE
            }
        },
        Command::Redirect { number, params } => {
            let pairs: Vec<(&str, &str)> = params
                .iter()
                .map(|p| p.split_once('=').unwrap_or((p.as_str(), "")))
                .collect();
            println!("{}", build_redirect_target(&number, &pairs));
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands_and_language() {
        let cli = Cli::try_parse_from(["scoreboard", "--lang", "es-MX", "status", "3"]).unwrap();
        assert_eq!(cli.lang, Language::Es);
        assert_eq!(cli.server, "http://127.0.0.1:8080");
        assert!(matches!(cli.command, Command::Status { court } if court == "3"));

        let cli = Cli::try_parse_from(["scoreboard", "redirect", "7", "a=1", "b=2"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Redirect { ref params, .. } if params.len() == 2
        ));
    }

    #[test]
    fn rejects_unknown_language() {
        assert!(Cli::try_parse_from(["scoreboard", "--lang", "fr", "history"]).is_err());
    }
}
