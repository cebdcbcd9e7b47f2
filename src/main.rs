use github_oauth_connector::AppConfig;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = github_oauth_connector::run(config).await {
        eprintln!("fatal: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
