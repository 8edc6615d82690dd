pub mod action;
pub mod chain;
pub mod command;
pub mod context;
pub mod contract;
pub mod filter;
pub mod module;
pub mod route;

pub use action::{Action, NavigateTarget, NotifyLevel, PromptKind};
pub use chain::Chain;
pub use command::{parse_command, Command};
pub use context::{Context, Selected};
pub use contract::{ContractEntry, ContractType, Role};
pub use filter::FilterState;
pub use module::Module;
pub use route::WalletTarget;
