pub mod common;
pub mod image;
pub mod pages;
pub mod reddit;
pub mod visited;

pub use common::{health, root};
pub use image::proxy_image;
pub use pages::{subreddit_page, user_page};
pub use reddit::reddit_listing;
pub use visited::{history_add, history_list, history_remove};
