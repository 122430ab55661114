use crate::http::{create_router, serve};
use application::rag_service::RagService;
use clap::Parser;
use infrastructure::config::Config;
use shared::telemetry::init_tracing;
use shared::types::Result;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "rag_relay")]
#[command(about = "Answers questions from vector-search context via a hosted LLM")]
pub struct Cli {
    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub struct CliApp {
    config: Config,
}

impl CliApp {
    /// Initialises logging, then reads `.env` and the environment.
    pub fn new() -> Self {
        init_tracing();
        Self::with_config(Config::load())
    }

    pub fn with_config(config: Config) -> Self {
        config.warn_if_incomplete();
        Self { config }
    }

    pub fn listen_addr(&self, cli: &Cli) -> SocketAddr {
        SocketAddr::new(cli.host, cli.port.unwrap_or(self.config.port))
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        let addr = self.listen_addr(&cli);
        tracing::info!(model = %self.config.model_name, "starting relay");

        let service = Arc::new(RagService::from_config(&self.config));
        serve(create_router(service), addr).await?;
        Ok(())
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
