pub mod dailymotion;
pub mod twitch;
pub mod youtube;

pub use dailymotion::Dailymotion;
pub use twitch::Twitch;
pub use youtube::Youtube;
