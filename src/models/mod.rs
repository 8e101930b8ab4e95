mod news;

pub use news::{MetaFilter, NewsId, NewsItem, NewsSummary};
