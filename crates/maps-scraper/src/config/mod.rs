pub mod params;
pub mod schema;
pub mod steps;

pub use params::{ParamDef, Params};
pub use schema::{
    load_document, parse_document, BrowserConfig, Config, ExtractConfig, PollConfig, TargetUrl,
    WaitConfig, WaitStrategy,
};
pub use steps::Step;
