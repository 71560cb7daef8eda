//! CLI command handlers, one file per subcommand.

mod forget;
mod positions;
mod submit;
mod sweep;
mod watch;

pub use forget::run_forget;
pub use positions::run_positions;
pub use submit::run_submit;
pub use sweep::run_sweep;
pub use watch::run_watch;
