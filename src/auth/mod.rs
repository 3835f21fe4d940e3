pub mod handlers;
pub mod middleware;
pub mod model;

#[cfg(test)]
mod tests;

pub use handlers::*;
pub use middleware::*;
pub use model::*;
