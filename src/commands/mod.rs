// ABOUTME: Command module aggregator for the kubeform CLI.
// ABOUTME: Re-exports up, verify and status command handlers.

mod status;
mod up;
mod verify;

pub use status::status;
pub use up::up;
pub use verify::verify;
