pub fn main() -> miette::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| miette::miette!("failed building the runtime: {e}"))?;

    let result = runtime.block_on(compy::cli::execute());

    // Avoid waiting for pending tasks to complete.
    runtime.shutdown_background();

    result
}
