use std::process::ExitCode;

use hazel_driver::{Argument, Parser};

fn main() -> ExitCode {
    let argument = Argument::parse();
    hazel_driver::run(argument)
}
