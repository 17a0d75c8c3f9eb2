use env_logger::Env;
use trawl::{configuration::get_configuration, startup::Application};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");
    log::info!("Data root: {}", configuration.storage.data_root.display());

    let application = Application::build(configuration)?;
    let report = application.run_until_done().await?;

    log::info!("Wrote {} metadata files", report.written.len());
    for (prompt, reason) in report.failed.iter() {
        log::error!("Prompt {} failed: {}", prompt, reason);
    }

    Ok(())
}
