mod visited_history;
mod listing_api;
mod pages;
