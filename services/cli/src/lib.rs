mod cli;
mod demo;

use notfellchen::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
