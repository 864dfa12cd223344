// src/main.rs
use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(err) = river_label::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
