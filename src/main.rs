use std::process::ExitCode;

use ytool::output as out;
use ytool::YtoolError;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = ytool::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // YtoolError already carries its io source in the message.
            match e.downcast_ref::<YtoolError>() {
                Some(ye) => out::print_error(&ye.to_string(), ye.hint()),
                None => out::print_error(&format!("{e:#}"), None),
            }
            ExitCode::FAILURE
        }
    }
}
