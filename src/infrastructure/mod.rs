pub mod core;
pub mod delivery;
pub mod factory;
pub mod mock;
pub mod news;
pub mod observability;
pub mod twelvedata;

pub use factory::ServiceFactory;
