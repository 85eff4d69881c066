pub mod cli;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod state;

pub use cli::{Cli, CliError};
pub use error::GatewayError;
pub use logging::init_logging;
pub use server::{create_router, run_server};
pub use state::Gateway;
