use backoffice::{BackOffice, Config, init_logger_with_file, setup_environment};

fn main() -> anyhow::Result<()> {
    // 1. .env, then configuration
    setup_environment();
    let config = Config::from_env();

    // 2. Logging
    let log_dir = config.log_to_file.then(|| config.log_dir());
    init_logger_with_file(&config.log_level, config.log_json, log_dir.as_deref())?;

    tracing::info!(
        work_dir = %config.work_dir,
        environment = %config.environment,
        backend = ?config.store_backend,
        "Back-office starting"
    );

    // 3. Context
    let office = BackOffice::initialize(&config)?;

    for (id, role) in office.roles().effective_roles() {
        tracing::info!(
            role_id = %id,
            name = %role.name,
            grants = role.grant_count(),
            custom = office.roles().custom_roles().contains_key(&id),
            "Role"
        );
    }

    let current = office.current_role();
    tracing::info!(
        user_id = ?current.user_id(),
        role_id = %current.role_id(),
        "Current session"
    );

    Ok(())
}
