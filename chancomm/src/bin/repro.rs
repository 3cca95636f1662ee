//! Binary entry point for the channel-communicator set/get repro.
//!
//! Runs all localities in-process on a current-thread runtime:
//!
//! ```bash
//! cargo run --bin repro -- --localities=2
//! ```

use chancomm::{InitParams, RUN_DRIVER_MAIN, RuntimeBuilder, driver};

fn parse_localities(args: &[String]) -> u32 {
    args.iter()
        .find_map(|arg| arg.strip_prefix("--localities="))
        .and_then(|n| n.parse().ok())
        .unwrap_or(2)
}

fn main() {
    tracing_subscriber::fmt::init();

    // Forward the process arguments to the runtime, plus the fixed directive
    // asking it to run the driver as the program's main body.
    let args: Vec<String> = std::env::args().skip(1).collect();
    let localities = parse_localities(&args);
    let mut cfg = args;
    cfg.push(RUN_DRIVER_MAIN.to_string());
    let params = InitParams { cfg };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("Failed to build current-thread runtime");
    let local = tokio::task::LocalSet::new();

    let run_main = params.has_directive(RUN_DRIVER_MAIN);
    let result = runtime.block_on(local.run_until(async move {
        let builder = RuntimeBuilder::new().localities(localities).init_params(params);
        if run_main {
            builder.run(driver::run).await
        } else {
            builder.run(|ctx| async move { ctx.finalize() }).await
        }
    }));

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("runtime failed to start: {err}");
            std::process::exit(1);
        }
    }
}
