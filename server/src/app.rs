//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::WellStores;
use crate::data::sql::Backend;
use crate::domain::{ClientRequest, DatasetRegistry};
use crate::utils::terminal::dim;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub registry: Arc<DatasetRegistry>,
    pub stores: WellStores,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let (cli_config, command) = cli::parse();
        Self::init_logging(cli_config.debug);

        tracing::debug!("Application starting");
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Datasets) => return Self::print_datasets(),
            Some(Commands::Explain { dataset, params }) => {
                return Self::explain(&cli_config, &dataset, &params);
            }
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let registry = Arc::new(DatasetRegistry::standard());

        let stores = WellStores::open(
            config.datasets.iter().map(|(slug, url)| (slug.clone(), url)),
            &config.database,
        )
        .context("Failed to open dataset stores")?;
        tracing::debug!(datasets = stores.len(), "Dataset stores ready");

        let shutdown = ShutdownService::new(stores.clone());

        Ok(Self {
            shutdown,
            config,
            registry,
            stores,
        })
    }

    fn init_logging(debug: bool) {
        let level = if debug { "debug" } else { "info" };
        let default_filter = format!("info,{}_server={}", APP_NAME_LOWER, level);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    /// Print every dataset with its filters and category names
    fn print_datasets() -> Result<()> {
        let registry = DatasetRegistry::standard();
        for retriever in registry.iter() {
            let description = retriever.describe();
            println!(
                "\x1b[1m{}\x1b[0m {}",
                description.name,
                dim(&description.table)
            );
            for filter in &description.filters {
                println!(
                    "  {:<10} {:<12} {}",
                    filter.name.as_str(),
                    filter.kind.as_str(),
                    dim(&filter.column)
                );
                if !filter.categories.is_empty() {
                    println!("  {:<10} {}", "", filter.categories.join(", "));
                }
            }
            println!();
        }
        Ok(())
    }

    /// Print the statements a request would run, without opening a database
    fn explain(cli: &CliConfig, dataset: &str, params: &[(String, String)]) -> Result<()> {
        let config = AppConfig::load(cli)?;
        let registry = DatasetRegistry::standard();
        let retriever = registry
            .get(dataset)
            .with_context(|| format!("Unknown dataset '{}'", dataset))?;
        let backend = config
            .dataset_url(dataset)
            .and_then(Backend::from_url)
            .unwrap_or(Backend::Sqlite);
        let dialect = backend.dialect();

        let request = ClientRequest::decode(params, retriever)?;
        let plan = retriever.build(&request);

        println!("{} {}", dim("backend:"), backend);
        for applied in &plan.filters {
            println!("{} {} {}", dim("filter:"), applied.name, applied.predicate.sql());
        }
        println!("{} {}", dim("count:"), plan.query.to_count_sql(dialect));

        match request.total.filter(|t| *t > 0) {
            Some(total) => {
                let page = request.page.filter(|p| *p > 0).unwrap_or(1);
                let pages = retriever.plan_pages(total, request.chunk);
                let bounded = plan.query.paginate(pages.chunk, pages.offset(page));
                println!(
                    "{} chunk={} pageCount={} page={}",
                    dim("pages:"),
                    pages.chunk,
                    pages.page_count,
                    page
                );
                println!("{} {}", dim("statement:"), bounded.to_literal_sql(dialect));
            }
            None => {
                println!("{} {}", dim("statement:"), plan.query.to_literal_sql(dialect));
            }
        }
        Ok(())
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        let datasets: Vec<(String, Backend)> = app
            .stores
            .iter()
            .map(|(slug, store)| (slug.to_string(), store.backend()))
            .collect();
        banner::print_banner(&app.config.server.host, app.config.server.port, &datasets);

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
