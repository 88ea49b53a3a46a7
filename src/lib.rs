pub mod api;
pub mod clients;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod scheduler;
pub mod services;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
pub use config::Config;
use db::Store;
use domain::types::{PlanStatus, UserRole};
use scheduler::Scheduler;
use services::TenantService;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let mut builder = tracing_loki::builder().label("app", "guardia")?;
        for (key, value) in &config.observability.loki_labels {
            builder = builder.extra_field(key.clone(), value.clone())?;
        }
        let (layer, task) = builder.build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "daemon" | "-d" | "--daemon" => run_daemon(config, prometheus_handle).await,

        "check-deadlines" => run_deadline_check(config).await,

        "init" | "--init" => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        "tenant" => {
            if args.len() < 3 {
                println!("Usage: guardia tenant <subcommand>");
                println!("Subcommands: add, list, plan");
                return Ok(());
            }
            match args[2].as_str() {
                "add" => {
                    if args.len() < 5 {
                        println!("Usage: guardia tenant add <cnpj> <name> [contact_email]");
                        println!("Example: guardia tenant add \"12.345.678/0001-90\" \"Acme Corp Ltda.\"");
                        return Ok(());
                    }
                    let cnpj = &args[3];
                    let name = &args[4];
                    let email = args.get(5).map(String::as_str);
                    cmd_tenant_add(&config, cnpj, name, email).await
                }
                "list" | "ls" => cmd_tenant_list(&config).await,
                "plan" => {
                    if args.len() < 5 {
                        println!("Usage: guardia tenant plan <tenant_id> <active|trial|suspended|cancelled>");
                        return Ok(());
                    }
                    cmd_tenant_plan(&config, &args[3], &args[4]).await
                }
                _ => {
                    println!("Unknown tenant subcommand: {}", args[2]);
                    println!("Use: add, list, plan");
                    Ok(())
                }
            }
        }

        "user" => {
            if args.len() < 3 {
                println!("Usage: guardia user <subcommand>");
                println!("Subcommands: add, list");
                return Ok(());
            }
            match args[2].as_str() {
                "add" => {
                    if args.len() < 7 {
                        println!(
                            "Usage: guardia user add <tenant_id> <email> <name> <super_admin|company_admin|dpo|user>"
                        );
                        return Ok(());
                    }
                    cmd_user_add(&config, &args[3], &args[4], &args[5], &args[6]).await
                }
                "list" | "ls" => {
                    if args.len() < 4 {
                        println!("Usage: guardia user list <tenant_id>");
                        return Ok(());
                    }
                    cmd_user_list(&config, &args[3]).await
                }
                _ => {
                    println!("Unknown user subcommand: {}", args[2]);
                    println!("Use: add, list");
                    Ok(())
                }
            }
        }

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        _ => {
            println!("Unknown command: {}", args[1]);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Guardia - LGPD Compliance Management Server");
    println!("Multi-tenant data-protection operations tooling");
    println!();
    println!("USAGE:");
    println!("  guardia <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  daemon            Run the API server with the deadline scheduler");
    println!("  check-deadlines   Run a single DSAR deadline sweep");
    println!("  tenant <subcmd>   Manage tenants (add, list, plan)");
    println!("  user <subcmd>     Manage users (add, list)");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  guardia daemon                                  # Start the server");
    println!("  guardia tenant add \"12.345.678/0001-90\" \"Acme\"  # Provision a tenant");
    println!("  guardia tenant list                             # List tenants");
    println!("  guardia user add <tenant_id> dpo@acme.com \"Carol\" dpo");
    println!("  guardia check-deadlines                         # Flag overdue DSARs");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the server, AI access, scheduler, etc.");
    println!("  Set GEMINI_API_KEY in the environment to enable document generation.");
}

async fn run_daemon(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!(
        "Guardia v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    let api_state = api::create_app_state_from_config(config.clone(), prometheus_handle).await?;

    let scheduler = Scheduler::new(api_state.dsar_service.clone(), config.scheduler.clone());

    let scheduler_handle = tokio::spawn(async move {
        if let Err(e) = scheduler.start().await {
            error!("Scheduler error: {}", e);
        }
    });

    let server_handle: Option<tokio::task::JoinHandle<()>> = if config.server.enabled {
        let port = config.server.port;
        info!("Starting Web API on port {}", port);

        let app = api::router(api_state).await;
        let addr = format!("0.0.0.0:{}", port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        Some(tokio::spawn(async move {
            info!("🌐 API server running at http://0.0.0.0:{}", port);
            if let Err(e) = axum::serve(listener, app).await {
                error!("Web server error: {}", e);
            }
        }))
    } else {
        None
    };

    info!("Daemon running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    scheduler_handle.abort();
    if let Some(handle) = server_handle {
        handle.abort();
    }
    info!("Daemon stopped");

    Ok(())
}

async fn run_deadline_check(config: Config) -> anyhow::Result<()> {
    info!("Running DSAR deadline sweep...");

    let store = Store::new(&config.general.database_path).await?;
    let (event_bus, _) = tokio::sync::broadcast::channel(config.general.event_bus_buffer_size);

    let audit_service = Arc::new(services::AuditService::new(store.clone(), event_bus.clone()));
    audit_service.start_listener();

    let dsar_service = Arc::new(services::DsarService::new(store, event_bus));
    let scheduler = Scheduler::new(dsar_service, config.scheduler.clone());

    let overdue = scheduler.run_once().await?;

    if overdue == 0 {
        println!("All open data-subject requests are within their deadline.");
    } else {
        println!("⚠ {overdue} request(s) past their response deadline. See the audit log.");
    }

    Ok(())
}

fn tenant_event_bus() -> tokio::sync::broadcast::Sender<domain::events::DomainEvent> {
    let (event_bus, _) = tokio::sync::broadcast::channel(16);
    event_bus
}

async fn cmd_tenant_add(
    config: &Config,
    cnpj: &str,
    name: &str,
    email: Option<&str>,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let service = TenantService::new(store, config.security.clone(), tenant_event_bus());

    let tenant = service
        .provision(cnpj, name, &PlanStatus::Active.to_string(), email)
        .await?;

    println!("✓ Tenant provisioned: {} (ID: {})", tenant.name, tenant.id);
    println!("  CNPJ: {}", tenant.cnpj);
    println!();
    println!("Create its first admin with:");
    println!("  guardia user add {} admin@example.com \"Admin\" company_admin", tenant.id);

    Ok(())
}

async fn cmd_tenant_list(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let tenants = store.list_tenants().await?;

    if tenants.is_empty() {
        println!("No tenants provisioned.");
        return Ok(());
    }

    println!("Tenants ({} total)", tenants.len());
    println!("{:-<70}", "");

    for tenant in tenants {
        let status_indicator = match tenant.plan_status.as_str() {
            "active" => "🟢",
            "trial" => "🟡",
            _ => "⏸",
        };

        println!("{} {} [{}]", status_indicator, tenant.name, tenant.plan_status);
        println!("  ID: {} | CNPJ: {}", tenant.id, tenant.cnpj);
    }

    println!();
    println!("Legend: 🟢 Active | 🟡 Trial | ⏸ Suspended/Cancelled");

    Ok(())
}

async fn cmd_tenant_plan(config: &Config, tenant_id: &str, plan: &str) -> anyhow::Result<()> {
    let plan: PlanStatus = plan
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let store = Store::new(&config.general.database_path).await?;

    let Some(tenant) = store.get_tenant(tenant_id).await? else {
        println!("Tenant with ID {} not found.", tenant_id);
        return Ok(());
    };

    store
        .set_tenant_plan_status(tenant_id, &plan.to_string())
        .await?;

    println!("✓ {} plan set to {}", tenant.name, plan);

    Ok(())
}

async fn cmd_user_add(
    config: &Config,
    tenant_id: &str,
    email: &str,
    name: &str,
    role: &str,
) -> anyhow::Result<()> {
    let role: UserRole = role.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let store = Store::new(&config.general.database_path).await?;

    if store.get_tenant(tenant_id).await?.is_none() {
        println!("Tenant with ID {} not found.", tenant_id);
        println!("Use 'guardia tenant list' to see tenant IDs.");
        return Ok(());
    }

    println!("Password for {email} (min {} chars):", config.security.min_password_length);
    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\n', '\r']);

    let service = TenantService::new(store, config.security.clone(), tenant_event_bus());
    let user = service
        .create_user(tenant_id, email, name, role, password)
        .await?;

    println!();
    println!("✓ User created: {} <{}>", user.name, user.email);
    println!("  Role: {} | ID: {}", user.role, user.id);
    println!("  API key: {}", user.api_key);

    Ok(())
}

async fn cmd_user_list(config: &Config, tenant_id: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let users = store.list_users(tenant_id).await?;

    if users.is_empty() {
        println!("No users for tenant {}.", tenant_id);
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let status = if user.is_active { "✓" } else { "⏸" };
        let last_login = user.last_login.as_deref().unwrap_or("Never");

        println!("{} {} <{}>", status, user.name, user.email);
        println!("  Role: {} | Last login: {}", user.role, last_login);
    }

    println!();
    println!("Legend: ✓ Active | ⏸ Disabled");

    Ok(())
}
