// infrascript command-line entry point
// Usage: infrascript <check|tree|tokens|ast> ...

use std::process::ExitCode;

fn main() -> ExitCode {
    infrascript::cli::run()
}
