pub mod enricher;
pub mod fuzzy;
pub mod providers;
pub mod ranking;
pub mod recommender;
pub mod title_resolver;

pub use enricher::MetadataEnricher;
pub use recommender::Recommender;
pub use title_resolver::TitleResolver;
