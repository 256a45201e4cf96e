use std::process::ExitCode;

fn main() -> ExitCode {
    match malaria_risk_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal: {e}");
            ExitCode::FAILURE
        }
    }
}
