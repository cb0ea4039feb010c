//! The two independent consumers of a merged scope: the HTML page and the
//! calendar feed.

pub mod calendar;
pub mod html;
pub mod view;
pub mod vtimezone;

pub const HTML_FILE: &str = "index.html";
pub const CALENDAR_FILE: &str = "schedule.ics";

pub use calendar::{FeedOptions, render_feed};
pub use html::{Assets, render_page};
pub use view::build_page;
