use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::server;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Interface to bind; defaults to PRLENS_HOST.
    #[arg(long)]
    pub host: Option<String>,
    /// Port to bind; defaults to PRLENS_PORT.
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn run(mut ctx: AppContext, args: ServeArgs) -> AppResult<()> {
    if let Some(host) = args.host {
        ctx.config.host = host;
    }
    if let Some(port) = args.port {
        ctx.config.port = port;
    }
    let address = ctx.config.bind_address();
    server::serve(ctx, &address).await
}
