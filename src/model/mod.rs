pub mod game;
pub mod item;
pub mod location;
pub mod note;
pub mod team;

pub use game::{Game, GameTime, HomeAway, ResultTag, ScheduleDate, Venue};
pub use item::ScheduleItem;
pub use location::Location;
pub use note::{Audience, Note};
pub use team::{ResultsLocator, Team};
