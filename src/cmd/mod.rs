//! CLI command implementations.
//!
//! | Module   | Mode handled |
//! |----------|--------------|
//! | `create` | `create`     |
//! | `setup`  | `setup`      |

pub mod create;
pub mod setup;

pub use create::cmd_create;
pub use setup::cmd_setup;
