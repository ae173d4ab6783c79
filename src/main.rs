use anyhow::Result;
use excel_interviewer::orchestrator::App;
use excel_interviewer::utils::logging;
use excel_interviewer::Config;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = Config::load()?;

    App::initialize(config).await?.run().await?;

    Ok(())
}
