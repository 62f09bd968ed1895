// Library exports for testing
pub use app::App;
pub use config::GameConfig;
pub use entities::{Body, Enemy, Entity, EntityId, EntityKind, GameState, Player, Projectile};
pub use timestep::FixedTimestep;
pub use world::{Stats, World};

pub mod app;
pub mod collision;
pub mod config;
pub mod entities;
pub mod input;
pub mod renderer;
pub mod spawner;
pub mod timestep;
pub mod tuning;
pub mod world;
