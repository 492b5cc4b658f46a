use ewa_core::{
    cli::{output, run_cli, USAGE},
    init, AppError,
};

fn main() {
    init();

    if let Err(err) = run_cli() {
        output::error(&err);
        if matches!(err, AppError::Invalid(_)) {
            eprintln!("{USAGE}");
        }
        std::process::exit(1);
    }
}
