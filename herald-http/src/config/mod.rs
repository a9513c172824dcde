mod agent;
pub use agent::Agent;

mod app;
pub use app::App;

mod resolver;
pub use resolver::Resolver;

mod config;
pub use config::Config;

mod parser;
pub use parser::Parser;
