pub mod elasticsearch;

pub use elasticsearch::{ElasticConfig, ElasticsearchStore, ModelWaitOptions};
