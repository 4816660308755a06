mod activity_page;

pub use activity_page::ActivityPage;
