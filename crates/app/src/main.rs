use anyhow::Context;

use ledgerdash_app::{AppConfig, Workspace, config};

fn main() -> anyhow::Result<()> {
    let log_format = config::log_format_from_env()?;
    ledgerdash_observability::init(log_format);

    let config = AppConfig::from_env().context("invalid configuration")?;
    let settings = config.journal_settings()?;
    let catalogs = config.load_catalogs()?;

    let today = chrono::Local::now().date_naive();
    let mut workspace = Workspace::new(settings, catalogs, today);

    tracing::info!(
        home_state = %config.home_state,
        default_tax_rate = %config.default_tax_rate,
        due_days = config.due_days,
        "ledgerdash ready; reading actions from stdin"
    );

    let handled = ledgerdash_app::run(
        &mut workspace,
        std::io::stdin().lock(),
        std::io::stdout().lock(),
    )?;
    tracing::info!(handled, "input closed");
    Ok(())
}
