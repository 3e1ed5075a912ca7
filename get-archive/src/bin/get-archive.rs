use clap::Parser;
use get_archive::{double_dash_flags, error_chain, run, Args, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from(Args::parse_from(double_dash_flags(std::env::args_os())));
    if let Err(err) = run(&config).await {
        log::error!("{}", error_chain(&err));
        std::process::exit(1);
    }
}
