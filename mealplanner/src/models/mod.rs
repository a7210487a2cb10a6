mod auth;
mod chef;
mod detection;
mod item;
mod meal;
mod plan;
mod profile;
mod utensil;

pub use auth::*;
pub use chef::*;
pub use detection::*;
pub use item::*;
pub use meal::*;
pub use plan::*;
pub use profile::*;
pub use utensil::*;
